//! Public API trait for the resource server.

use async_trait::async_trait;
use uma_security::CallerContext;

use crate::error::ResourceServerError;
use crate::models::{AccessDecision, RevokeOutcome};

/// Public API trait for the resource server.
///
/// Implemented in-process by the module's local client and consumed by the
/// REST boundary (or any other transport):
///
/// ```ignore
/// let decision = client.decide(&ctx, resource_uid, "view").await?;
/// let revoked = client.revoke(&ctx, resource_uid).await?;
/// ```
#[async_trait]
pub trait ResourceServerClient: Send + Sync {
    /// Decide whether the caller may access `resource_uid` with the
    /// space-delimited `scopes`.
    ///
    /// Every routine protocol result, including a permission ticket demand,
    /// is returned in `Ok`.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if `resource_uid` is empty
    /// - `Unauthorized` if the caller's session does not resolve to a user
    /// - `ServiceUnavailable` if a collaborator call failed
    /// - `Internal` for broken invariants
    async fn decide(
        &self,
        ctx: &CallerContext,
        resource_uid: &str,
        scopes: &str,
    ) -> Result<AccessDecision, ResourceServerError>;

    /// Remove the caller's own grant from the policy of `resource_uid`.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if `resource_uid` is empty
    /// - `NotFound` if the resource does not exist
    /// - `Unauthorized` if no subject can be resolved for the caller
    /// - `ServiceUnavailable` if a policy read or write failed
    /// - `Internal` for broken invariants
    async fn revoke(
        &self,
        ctx: &CallerContext,
        resource_uid: &str,
    ) -> Result<RevokeOutcome, ResourceServerError>;
}
