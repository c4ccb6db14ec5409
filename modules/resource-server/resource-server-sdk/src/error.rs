//! Error types for the resource server module.

use thiserror::Error;

/// Errors that can occur when using the resource server API or its collaborators.
///
/// These represent infrastructure/transport failures only.
/// Protocol results such as a missing token or a mixed scope request are
/// expressed via [`crate::DecisionOutcome`], not as error variants.
#[derive(Debug, Error)]
pub enum ResourceServerError {
    /// The addressed entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request itself is malformed (e.g. an empty resource id).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The caller (or the credential used on its behalf) was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A collaborator could not be reached or refused to serve the call.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
