//! Access decision engine.

use std::sync::Arc;

use resource_server_sdk::{
    AccessDecision, AccessTokenProvider, ContentStore, DecisionOutcome, Registration,
    RegistrationService, Resource, ResourceServerError, ResourceStore, ScopeSummary,
};
use serde_json::{Map, Value};
use tracing::field::Empty;
use tracing::{debug, info};
use uma_security::CallerContext;

use super::credentials::owner_access_token;
use super::error::DomainError;
use super::policy::PolicyReader;
use super::scopes::{self, MixClass, ScopeRequest};
use super::ticket::TicketIssuer;
use super::token::TokenValidator;

const MSG_SUCCESS: &str = "Success";
const MSG_NEED_TICKET: &str = "RPT is missing or invalid";
const MSG_CONFLICT: &str = "Requested scopes are mixed";
const MSG_INVALID_SCOPE: &str = "Requested scope(s) not valid";
const MSG_MISSING_SCOPES: &str = "Missing scopes";
const MSG_NOT_REGISTERED: &str = "Resource is not registered";

/// Scope names that toggle attachments on a successful decision.
#[derive(Debug, Clone)]
pub struct AttachmentScopes {
    pub meta: String,
    pub content: String,
}

pub struct DecisionEngine {
    resources: Arc<dyn ResourceStore>,
    contents: Arc<dyn ContentStore>,
    registrations: Arc<dyn RegistrationService>,
    tokens: Arc<dyn AccessTokenProvider>,
    policy: PolicyReader,
    validator: TokenValidator,
    issuer: TicketIssuer,
    attachments: AttachmentScopes,
}

impl DecisionEngine {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        contents: Arc<dyn ContentStore>,
        registrations: Arc<dyn RegistrationService>,
        tokens: Arc<dyn AccessTokenProvider>,
        policy: PolicyReader,
        validator: TokenValidator,
        issuer: TicketIssuer,
        attachments: AttachmentScopes,
    ) -> Self {
        Self {
            resources,
            contents,
            registrations,
            tokens,
            policy,
            validator,
            issuer,
            attachments,
        }
    }

    /// Decide one access attempt on `resource_uid`.
    ///
    /// Steps run in a fixed order and the first failing check decides the
    /// outcome: resource, registration, scope presence, scope validity,
    /// policy conflict, then the token (or a ticket if there is none).
    ///
    /// # Errors
    ///
    /// Returns `DomainError` for an empty `resource_uid` and for any failed
    /// collaborator call other than a missing resource.
    #[tracing::instrument(skip_all, fields(resource_uid = %resource_uid, outcome = Empty))]
    pub async fn decide(
        &self,
        ctx: &CallerContext,
        resource_uid: &str,
        scopes_text: &str,
        subject: Option<&str>,
    ) -> Result<AccessDecision, DomainError> {
        let decision = self.run(ctx, resource_uid, scopes_text, subject).await?;
        tracing::Span::current().record("outcome", decision.outcome.name());
        info!(outcome = decision.outcome.name(), "access decided");
        Ok(decision)
    }

    async fn run(
        &self,
        ctx: &CallerContext,
        resource_uid: &str,
        scopes_text: &str,
        subject: Option<&str>,
    ) -> Result<AccessDecision, DomainError> {
        if resource_uid.trim().is_empty() {
            return Err(DomainError::InvalidRequest("resource id is empty".to_owned()));
        }

        let request = ScopeRequest::parse(
            scopes_text,
            &self.attachments.meta,
            &self.attachments.content,
        );
        let mut summary = ScopeSummary {
            requested: request.scopes.clone(),
            ..ScopeSummary::default()
        };

        let resource = match self.resources.read(resource_uid).await {
            Ok(resource) => resource,
            Err(ResourceServerError::NotFound(msg)) => {
                return Ok(finish(DecisionOutcome::NotFound, msg, summary));
            }
            Err(e) => return Err(DomainError::upstream("resource_read")(e)),
        };

        if resource.registration_id.is_empty() {
            return Ok(finish(
                DecisionOutcome::NotRegistered,
                MSG_NOT_REGISTERED,
                summary,
            ));
        }

        let registration = self.registration(&resource).await?;
        if resource.discoverable {
            summary.resource.clone_from(&registration.resource_scopes);
        }

        if request.is_empty() {
            return Ok(finish(
                DecisionOutcome::MissingScopes,
                MSG_MISSING_SCOPES,
                summary,
            ));
        }

        if !scopes::is_subset(&request.scopes, &registration.resource_scopes) {
            debug!(requested = ?request.scopes, "requested scopes outside registration");
            return Ok(finish(
                DecisionOutcome::InvalidScope,
                MSG_INVALID_SCOPE,
                summary,
            ));
        }

        summary.policy = self.policy.read_grant(&resource, subject).await?;
        if scopes::classify_mix(&request.scopes, &summary.policy) == MixClass::Mixed {
            return Ok(finish(DecisionOutcome::Conflict, MSG_CONFLICT, summary));
        }

        let check = self
            .validator
            .validate(ctx.rpt(), &request.scopes, &resource)
            .await?;
        debug!(token_status = ?check.status, "{}", check.message);
        let valid = check.is_valid();
        summary.token = check.scopes;

        if valid {
            let meta = request
                .meta
                .then(|| metadata_document(&resource, &registration));
            let content = if request.content {
                Some(self.content_document(&resource).await?)
            } else {
                None
            };
            return Ok(finish(
                DecisionOutcome::Success { meta, content },
                MSG_SUCCESS,
                summary,
            ));
        }

        let ticket = self.issuer.issue(&request.scopes, &resource).await?;
        Ok(finish(
            DecisionOutcome::NeedTicket(ticket),
            MSG_NEED_TICKET,
            summary,
        ))
    }

    async fn registration(&self, resource: &Resource) -> Result<Registration, DomainError> {
        let pat = owner_access_token(self.tokens.as_ref(), &resource.owner).await?;
        self.registrations
            .read(&resource.registration_id, &pat)
            .await
            .map_err(DomainError::upstream("registration_read"))
    }

    async fn content_document(&self, resource: &Resource) -> Result<Value, DomainError> {
        let content = self
            .contents
            .read(resource)
            .await
            .map_err(DomainError::upstream("content_read"))?;
        Ok(content.unwrap_or_else(|| Value::Object(Map::new())))
    }
}

fn finish(
    outcome: DecisionOutcome,
    message: impl Into<String>,
    scopes: ScopeSummary,
) -> AccessDecision {
    AccessDecision {
        outcome,
        message: message.into(),
        scopes,
    }
}

/// Resource metadata as shown to a requesting party.
fn metadata_document(resource: &Resource, registration: &Registration) -> Map<String, Value> {
    let mut meta = resource.metadata.clone();
    meta.remove("discoverable");
    meta.insert("owner".to_owned(), Value::String(resource.owner.clone()));
    if let Some(icon) = &registration.icon_uri {
        meta.insert("icon_uri".to_owned(), Value::String(icon.clone()));
    }
    meta
}
