//! Requesting party token validation.

use std::sync::Arc;

use resource_server_sdk::{AccessTokenProvider, IntrospectionService, Resource};
use secrecy::SecretString;
use tracing::debug;

use super::credentials::owner_access_token;
use super::error::DomainError;
use super::scopes;

const MSG_EMPTY: &str = "Requesting Party Token is empty";
const MSG_INACTIVE: &str = "Requesting Party Token is NOT valid";
const MSG_SCOPES: &str = "Requested scope(s) not found in Token scopes";
const MSG_VALID: &str = "Requesting Party Token is valid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// No token was presented.
    Missing,
    /// Inactive, or not covering the requested scopes.
    Invalid,
    Valid,
}

/// Result of validating a token against one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCheck {
    pub status: TokenStatus,
    pub message: &'static str,
    /// Scopes of the token's permission entry for the resource.
    pub scopes: Vec<String>,
}

impl TokenCheck {
    fn new(status: TokenStatus, message: &'static str, scopes: Vec<String>) -> Self {
        Self {
            status,
            message,
            scopes,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status == TokenStatus::Valid
    }
}

/// Checks a presented RPT through the authorization server.
pub struct TokenValidator {
    tokens: Arc<dyn AccessTokenProvider>,
    introspection: Arc<dyn IntrospectionService>,
}

impl TokenValidator {
    #[must_use]
    pub fn new(
        tokens: Arc<dyn AccessTokenProvider>,
        introspection: Arc<dyn IntrospectionService>,
    ) -> Self {
        Self {
            tokens,
            introspection,
        }
    }

    /// Validate `rpt` for `requested` scopes on `resource`.
    ///
    /// Only the first permission entry naming the resource registration is
    /// consulted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the owner token cannot be obtained or
    /// introspection fails.
    #[tracing::instrument(skip_all, fields(resource_uid = %resource.uid))]
    pub async fn validate(
        &self,
        rpt: Option<&SecretString>,
        requested: &[String],
        resource: &Resource,
    ) -> Result<TokenCheck, DomainError> {
        let Some(rpt) = rpt else {
            return Ok(TokenCheck::new(TokenStatus::Missing, MSG_EMPTY, Vec::new()));
        };

        let pat = owner_access_token(self.tokens.as_ref(), &resource.owner).await?;
        let introspection = self
            .introspection
            .introspect(rpt, &pat)
            .await
            .map_err(DomainError::upstream("introspect"))?;

        if !introspection.active {
            debug!("token is not active");
            return Ok(TokenCheck::new(TokenStatus::Invalid, MSG_INACTIVE, Vec::new()));
        }

        let token_scopes = introspection
            .permissions
            .into_iter()
            .find(|p| p.resource_id == resource.registration_id)
            .map_or_else(Vec::new, |p| p.resource_scopes);

        if scopes::is_subset(requested, &token_scopes) {
            Ok(TokenCheck::new(TokenStatus::Valid, MSG_VALID, token_scopes))
        } else {
            debug!(?requested, ?token_scopes, "requested scopes not covered by token");
            Ok(TokenCheck::new(TokenStatus::Invalid, MSG_SCOPES, token_scopes))
        }
    }
}
