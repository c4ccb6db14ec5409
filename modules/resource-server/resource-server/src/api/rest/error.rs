use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use serde::Serialize;

use crate::domain::error::DomainError;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// RFC 7807 problem details body.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}

impl Problem {
    #[must_use]
    pub fn new(status: StatusCode, title: &str, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.to_owned(),
            status: status.as_u16(),
            detail: detail.into(),
        }
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut res = (status, Json(self)).into_response();
        res.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        res
    }
}

/// Convert domain errors to HTTP Problem responses
#[must_use]
pub fn domain_error_to_problem(err: DomainError) -> Problem {
    match err {
        DomainError::InvalidRequest(message) => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid Request", message)
        }
        DomainError::Unauthenticated(message) => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthenticated", message)
        }
        DomainError::NotFound(message) => {
            Problem::new(StatusCode::NOT_FOUND, "Not Found", message)
        }
        DomainError::Upstream { op, reason } => {
            tracing::warn!(operation = op, %reason, "upstream failure");
            Problem::new(
                StatusCode::BAD_GATEWAY,
                "Upstream Failure",
                format!("call '{op}' failed"),
            )
        }
        DomainError::Internal(message) => {
            tracing::error!(%message, "internal error");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Error",
                "internal error",
            )
        }
    }
}

/// Implement Into<Problem> for `DomainError` so `?` works in handlers
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(e)
    }
}
