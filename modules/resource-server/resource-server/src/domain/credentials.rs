//! Credentials the engine uses on behalf of owners and administrators.

use resource_server_sdk::{AccessTokenProvider, IdentityService};
use secrecy::{ExposeSecret, SecretString};

use super::error::DomainError;

/// Protection API token of `owner`.
pub async fn owner_access_token(
    provider: &dyn AccessTokenProvider,
    owner: &str,
) -> Result<SecretString, DomainError> {
    if owner.is_empty() {
        return Err(DomainError::Internal("resource owner is empty".to_owned()));
    }

    let token = provider
        .owner_access_token(owner)
        .await
        .map_err(DomainError::upstream("owner_access_token"))?;

    if token.expose_secret().is_empty() {
        return Err(DomainError::Internal(format!(
            "empty access token for owner '{owner}'"
        )));
    }
    Ok(token)
}

/// Administrative credential for policy reads and writes.
pub async fn admin_credential(
    identity: &dyn IdentityService,
) -> Result<SecretString, DomainError> {
    let token = identity
        .resolve_admin_credential()
        .await
        .map_err(DomainError::upstream("admin_credential"))?;

    if token.expose_secret().is_empty() {
        return Err(DomainError::Internal("admin credential is empty".to_owned()));
    }
    Ok(token)
}
