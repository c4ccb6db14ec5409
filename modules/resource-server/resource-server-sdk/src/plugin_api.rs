//! Collaborator contracts consumed by the resource server.
//!
//! One trait per external service. Implementations own the wire format and
//! hand back typed models; every method reports transport trouble through
//! [`ResourceServerError`].

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use uma_security::CallerContext;

use crate::error::ResourceServerError;
use crate::models::{
    Introspection, Permission, PermissionRequestResult, Policy, Registration, Resource, WellKnown,
};

/// Read access to locally stored resources.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// # Errors
    ///
    /// - `NotFound` if no resource has this uid
    async fn read(&self, uid: &str) -> Result<Resource, ResourceServerError>;
}

/// Read access to resource content documents.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Content document of the resource, `None` when it has none.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` / `Internal` on storage failure
    async fn read(&self, resource: &Resource) -> Result<Option<Value>, ResourceServerError>;
}

/// Resource set registrations held by the authorization server.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// # Errors
    ///
    /// - `NotFound` if the registration does not exist
    /// - `Unauthorized` if the owner's token was rejected
    async fn read(
        &self,
        registration_id: &str,
        owner_token: &SecretString,
    ) -> Result<Registration, ResourceServerError>;
}

/// Owner policies held by the authorization server.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Current policy, `None` if the resource has none.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the admin credential was rejected
    async fn read(
        &self,
        registration_id: &str,
        admin_token: &SecretString,
        owner: &str,
    ) -> Result<Option<Policy>, ResourceServerError>;

    /// Overwrite the policy with `permissions`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the admin credential was rejected
    async fn replace(
        &self,
        registration_id: &str,
        admin_token: &SecretString,
        owner: &str,
        permissions: &[Permission],
    ) -> Result<(), ResourceServerError>;

    /// Remove the policy entirely.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the admin credential was rejected
    /// - `NotFound` if there was no policy to delete
    async fn delete(
        &self,
        registration_id: &str,
        admin_token: &SecretString,
        owner: &str,
    ) -> Result<(), ResourceServerError>;
}

/// Token introspection endpoint of the authorization server.
#[async_trait]
pub trait IntrospectionService: Send + Sync {
    /// # Errors
    ///
    /// - `Unauthorized` if `credential` was rejected
    async fn introspect(
        &self,
        rpt: &SecretString,
        credential: &SecretString,
    ) -> Result<Introspection, ResourceServerError>;
}

/// Permission registration endpoint of the authorization server.
#[async_trait]
pub trait PermissionService: Send + Sync {
    /// Ask for a permission ticket covering `resource_scopes` on `resource_id`.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if the endpoint could not be called at all
    async fn request(
        &self,
        resource_id: &str,
        resource_scopes: &[String],
        owner_token: &SecretString,
    ) -> Result<PermissionRequestResult, ResourceServerError>;
}

/// Session and administrative identity.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// User id behind the caller's session, `None` if there is no valid session.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if the session service could not be reached
    async fn resolve_subject(
        &self,
        ctx: &CallerContext,
    ) -> Result<Option<String>, ResourceServerError>;

    /// Credential used for policy reads and writes on behalf of owners.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the administrative login failed
    async fn resolve_admin_credential(&self) -> Result<SecretString, ResourceServerError>;
}

/// Protection API tokens for resource owners.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// # Errors
    ///
    /// - `NotFound` if the owner has no token
    async fn owner_access_token(&self, owner: &str) -> Result<SecretString, ResourceServerError>;
}

/// Discovery document of the authorization server.
#[async_trait]
pub trait DiscoveryService: Send + Sync {
    /// # Errors
    ///
    /// - `ServiceUnavailable` if the document could not be fetched
    async fn well_known(&self) -> Result<WellKnown, ResourceServerError>;
}
