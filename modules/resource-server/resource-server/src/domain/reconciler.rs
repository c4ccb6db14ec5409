//! Removes one subject's grant from a resource policy.

use std::sync::Arc;

use resource_server_sdk::{
    IdentityService, Permission, PolicyStore, ResourceServerError, ResourceStore, RevokeOutcome,
    RevokeStatus,
};
use tracing::info;

use super::credentials::admin_credential;
use super::error::DomainError;
use super::scopes;

pub struct PolicyReconciler {
    resources: Arc<dyn ResourceStore>,
    identity: Arc<dyn IdentityService>,
    policies: Arc<dyn PolicyStore>,
}

impl PolicyReconciler {
    #[must_use]
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        identity: Arc<dyn IdentityService>,
        policies: Arc<dyn PolicyStore>,
    ) -> Self {
        Self {
            resources,
            identity,
            policies,
        }
    }

    /// Drop every permission of `subject` from the policy of `resource_uid`.
    ///
    /// Deletes the policy when nothing would be left; a policy that is
    /// already gone at delete time counts as deleted. Revoking a grant that
    /// does not exist succeeds without writing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the resource is missing or unregistered, if
    /// the stored policy has no permissions, or if a policy read/write
    /// fails. Nothing is retried.
    #[tracing::instrument(skip_all, fields(resource_uid = %resource_uid))]
    pub async fn revoke(
        &self,
        resource_uid: &str,
        subject: &str,
    ) -> Result<RevokeOutcome, DomainError> {
        if resource_uid.trim().is_empty() {
            return Err(DomainError::InvalidRequest("resource id is empty".to_owned()));
        }
        if subject.is_empty() {
            return Err(DomainError::Unauthenticated("subject is empty".to_owned()));
        }

        let resource = self
            .resources
            .read(resource_uid)
            .await
            .map_err(|e| match e {
                ResourceServerError::NotFound(msg) => DomainError::NotFound(msg),
                other => DomainError::upstream("resource_read")(other),
            })?;
        if resource.owner.is_empty() {
            return Err(DomainError::Internal(format!(
                "resource '{resource_uid}' has no owner"
            )));
        }
        if resource.registration_id.is_empty() {
            return Err(DomainError::Internal(format!(
                "resource '{resource_uid}' is not registered"
            )));
        }

        let admin = admin_credential(self.identity.as_ref()).await?;
        let registration_id = resource.registration_id.as_str();
        let owner = resource.owner.as_str();

        let Some(policy) = self
            .policies
            .read(registration_id, &admin, owner)
            .await
            .map_err(DomainError::upstream("policy_read"))?
        else {
            info!("resource has no policy, nothing to revoke");
            return Ok(RevokeOutcome {
                status: RevokeStatus::NoPolicy,
                permissions: Vec::new(),
            });
        };

        if policy.permissions.is_empty() {
            return Err(DomainError::Internal(format!(
                "policy of resource '{resource_uid}' has no permissions"
            )));
        }

        let before = policy.permissions.len();
        let kept: Vec<Permission> = policy
            .permissions
            .iter()
            .filter(|p| !scopes::eq_ignore_case(&p.subject, subject))
            .cloned()
            .collect();

        if kept.len() == before {
            return Ok(RevokeOutcome {
                status: RevokeStatus::Unchanged,
                permissions: policy.permissions,
            });
        }

        if kept.is_empty() {
            match self.policies.delete(registration_id, &admin, owner).await {
                Ok(()) => info!("last grant revoked, policy deleted"),
                Err(ResourceServerError::NotFound(_)) => {
                    info!("policy already deleted by a concurrent revoke");
                }
                Err(e) => return Err(DomainError::upstream("policy_delete")(e)),
            }
            return Ok(RevokeOutcome {
                status: RevokeStatus::Deleted,
                permissions: Vec::new(),
            });
        }

        let kept = dedupe_subjects(kept);
        self.policies
            .replace(registration_id, &admin, owner, &kept)
            .await
            .map_err(DomainError::upstream("policy_replace"))?;
        info!(remaining = kept.len(), "grant revoked, policy replaced");

        Ok(RevokeOutcome {
            status: RevokeStatus::Replaced,
            permissions: kept,
        })
    }
}

/// One entry per subject, case-insensitively; the first entry wins.
fn dedupe_subjects(permissions: Vec<Permission>) -> Vec<Permission> {
    let mut out: Vec<Permission> = Vec::with_capacity(permissions.len());
    for perm in permissions {
        if !out.iter().any(|p| scopes::eq_ignore_case(&p.subject, &perm.subject)) {
            out.push(perm);
        }
    }
    out
}
