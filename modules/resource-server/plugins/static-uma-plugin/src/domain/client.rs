//! Collaborator trait implementations for the static UMA plugin.

use async_trait::async_trait;
use resource_server_sdk::{
    AccessTokenProvider, ContentStore, DiscoveryService, IdentityService, Introspection,
    IntrospectionService, Permission, PermissionRequestResult, PermissionService, Policy,
    PolicyStore, Registration, RegistrationService, Resource, ResourceServerError, ResourceStore,
    WellKnown,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use uma_security::CallerContext;

use super::service::Service;

#[async_trait]
impl ResourceStore for Service {
    async fn read(&self, uid: &str) -> Result<Resource, ResourceServerError> {
        self.resource(uid)
    }
}

#[async_trait]
impl ContentStore for Service {
    async fn read(&self, resource: &Resource) -> Result<Option<Value>, ResourceServerError> {
        Ok(self.content(resource))
    }
}

#[async_trait]
impl RegistrationService for Service {
    async fn read(
        &self,
        registration_id: &str,
        owner_token: &SecretString,
    ) -> Result<Registration, ResourceServerError> {
        self.registration(registration_id, owner_token.expose_secret())
    }
}

#[async_trait]
impl PolicyStore for Service {
    async fn read(
        &self,
        registration_id: &str,
        admin_token: &SecretString,
        _owner: &str,
    ) -> Result<Option<Policy>, ResourceServerError> {
        self.policy(registration_id, admin_token.expose_secret())
    }

    async fn replace(
        &self,
        registration_id: &str,
        admin_token: &SecretString,
        _owner: &str,
        permissions: &[Permission],
    ) -> Result<(), ResourceServerError> {
        self.replace_policy(registration_id, admin_token.expose_secret(), permissions)
    }

    async fn delete(
        &self,
        registration_id: &str,
        admin_token: &SecretString,
        _owner: &str,
    ) -> Result<(), ResourceServerError> {
        self.delete_policy(registration_id, admin_token.expose_secret())
    }
}

#[async_trait]
impl IntrospectionService for Service {
    async fn introspect(
        &self,
        rpt: &SecretString,
        credential: &SecretString,
    ) -> Result<Introspection, ResourceServerError> {
        Service::introspect(self, rpt.expose_secret(), credential.expose_secret())
    }
}

#[async_trait]
impl PermissionService for Service {
    async fn request(
        &self,
        resource_id: &str,
        _resource_scopes: &[String],
        owner_token: &SecretString,
    ) -> Result<PermissionRequestResult, ResourceServerError> {
        self.request_permission(resource_id, owner_token.expose_secret())
    }
}

#[async_trait]
impl IdentityService for Service {
    async fn resolve_subject(
        &self,
        ctx: &CallerContext,
    ) -> Result<Option<String>, ResourceServerError> {
        Ok(ctx
            .sso_token()
            .and_then(|t| self.session_subject(t.expose_secret())))
    }

    async fn resolve_admin_credential(&self) -> Result<SecretString, ResourceServerError> {
        Ok(SecretString::from(self.admin_credential().to_owned()))
    }
}

#[async_trait]
impl AccessTokenProvider for Service {
    async fn owner_access_token(&self, owner: &str) -> Result<SecretString, ResourceServerError> {
        self.owner_token(owner).map(SecretString::from)
    }
}

#[async_trait]
impl DiscoveryService for Service {
    async fn well_known(&self) -> Result<WellKnown, ResourceServerError> {
        Ok(WellKnown {
            issuer: self.issuer().to_owned(),
        })
    }
}
