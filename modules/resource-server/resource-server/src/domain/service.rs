//! Domain service for the resource server.

use std::sync::Arc;

use resource_server_sdk::{
    AccessDecision, AccessTokenProvider, ContentStore, DiscoveryService, IdentityService,
    IntrospectionService, PermissionService, PolicyStore, RegistrationService, ResourceStore,
    RevokeOutcome,
};
use tracing::debug;
use uma_security::CallerContext;

use super::engine::{AttachmentScopes, DecisionEngine};
use super::error::DomainError;
use super::policy::PolicyReader;
use super::reconciler::PolicyReconciler;
use super::ticket::TicketIssuer;
use super::token::TokenValidator;
use crate::config::ResourceServerConfig;

/// External services the resource server talks to.
///
/// Assembled once at startup; every field may point at the same object.
#[derive(Clone)]
pub struct Collaborators {
    pub resources: Arc<dyn ResourceStore>,
    pub contents: Arc<dyn ContentStore>,
    pub registrations: Arc<dyn RegistrationService>,
    pub policies: Arc<dyn PolicyStore>,
    pub introspection: Arc<dyn IntrospectionService>,
    pub permissions: Arc<dyn PermissionService>,
    pub identity: Arc<dyn IdentityService>,
    pub tokens: Arc<dyn AccessTokenProvider>,
    pub discovery: Arc<dyn DiscoveryService>,
}

impl Collaborators {
    /// Use one implementation for every collaborator.
    #[must_use]
    pub fn from_single<T>(backend: &Arc<T>) -> Self
    where
        T: ResourceStore
            + ContentStore
            + RegistrationService
            + PolicyStore
            + IntrospectionService
            + PermissionService
            + IdentityService
            + AccessTokenProvider
            + DiscoveryService
            + 'static,
    {
        Self {
            resources: backend.clone(),
            contents: backend.clone(),
            registrations: backend.clone(),
            policies: backend.clone(),
            introspection: backend.clone(),
            permissions: backend.clone(),
            identity: backend.clone(),
            tokens: backend.clone(),
            discovery: backend.clone(),
        }
    }
}

/// Resource server service: resolves the caller, then runs the decision
/// engine or the policy reconciler.
pub struct Service {
    identity: Arc<dyn IdentityService>,
    engine: DecisionEngine,
    reconciler: PolicyReconciler,
}

impl Service {
    #[must_use]
    pub fn new(collaborators: Collaborators, config: &ResourceServerConfig) -> Self {
        let Collaborators {
            resources,
            contents,
            registrations,
            policies,
            introspection,
            permissions,
            identity,
            tokens,
            discovery,
        } = collaborators;

        let engine = DecisionEngine::new(
            resources.clone(),
            contents,
            registrations,
            tokens.clone(),
            PolicyReader::new(identity.clone(), policies.clone()),
            TokenValidator::new(tokens.clone(), introspection),
            TicketIssuer::new(tokens, permissions, discovery),
            AttachmentScopes {
                meta: config.meta_scope.clone(),
                content: config.content_scope.clone(),
            },
        );
        let reconciler = PolicyReconciler::new(resources, identity.clone(), policies);

        Self {
            identity,
            engine,
            reconciler,
        }
    }

    /// Decide access to `resource_uid` for the caller.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if a session token is present but invalid
    /// - see [`DecisionEngine::decide`]
    #[tracing::instrument(skip_all, fields(resource_uid = %resource_uid))]
    pub async fn decide(
        &self,
        ctx: &CallerContext,
        resource_uid: &str,
        scopes: &str,
    ) -> Result<AccessDecision, DomainError> {
        let subject = self.subject(ctx).await?;
        self.engine
            .decide(ctx, resource_uid, scopes, subject.as_deref())
            .await
    }

    /// Revoke the caller's own grant on `resource_uid`.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if the caller has no subject
    /// - see [`PolicyReconciler::revoke`]
    #[tracing::instrument(skip_all, fields(resource_uid = %resource_uid))]
    pub async fn revoke(
        &self,
        ctx: &CallerContext,
        resource_uid: &str,
    ) -> Result<RevokeOutcome, DomainError> {
        let subject = self.subject(ctx).await?.ok_or_else(|| {
            DomainError::Unauthenticated("no authenticated subject".to_owned())
        })?;
        self.reconciler.revoke(resource_uid, &subject).await
    }

    /// Explicit subject, else the session's user. `None` for a caller with
    /// neither.
    async fn subject(&self, ctx: &CallerContext) -> Result<Option<String>, DomainError> {
        if let Some(subject) = ctx.subject() {
            return Ok(Some(subject.to_owned()));
        }
        if ctx.sso_token().is_none() {
            debug!("anonymous caller");
            return Ok(None);
        }

        let subject = self
            .identity
            .resolve_subject(ctx)
            .await
            .map_err(DomainError::upstream("resolve_subject"))?;

        subject
            .filter(|s| !s.is_empty())
            .map(Some)
            .ok_or_else(|| DomainError::Unauthenticated("session token is not valid".to_owned()))
    }
}
