//! Domain errors for the resource server.

use resource_server_sdk::ResourceServerError;

/// Fatal request failures.
///
/// Routine protocol results (missing token, mixed scopes, ...) are not
/// errors; see [`resource_server_sdk::DecisionOutcome`].
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("upstream call '{op}' failed: {reason}")]
    Upstream { op: &'static str, reason: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Wrap a collaborator failure, tagging the call that failed.
    pub(crate) fn upstream(op: &'static str) -> impl FnOnce(ResourceServerError) -> Self {
        move |e| Self::Upstream {
            op,
            reason: e.to_string(),
        }
    }
}

impl From<ResourceServerError> for DomainError {
    fn from(e: ResourceServerError) -> Self {
        match e {
            ResourceServerError::NotFound(msg) => Self::NotFound(msg),
            ResourceServerError::InvalidRequest(msg) => Self::InvalidRequest(msg),
            ResourceServerError::Unauthorized(msg) => Self::Unauthenticated(msg),
            ResourceServerError::ServiceUnavailable(msg) => Self::Upstream {
                op: "collaborator",
                reason: msg,
            },
            ResourceServerError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<DomainError> for ResourceServerError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidRequest(msg) => Self::InvalidRequest(msg),
            DomainError::Unauthenticated(msg) => Self::Unauthorized(msg),
            DomainError::NotFound(msg) => Self::NotFound(msg),
            DomainError::Upstream { op, reason } => {
                Self::ServiceUnavailable(format!("{op}: {reason}"))
            }
            DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}
