use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query};
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use resource_server_sdk::{DecisionOutcome, TicketStatus};
use tracing::field::Empty;
use tracing::{info, warn};
use uma_security::CallerContext;

use crate::api::rest::dto::{DecisionDto, ScopesQuery};
use crate::api::rest::error::Problem;
use crate::config::ResourceServerConfig;
use crate::domain::Service;

/// Build the caller context from transport headers.
///
/// The session token comes from the SSO cookie, else from the SSO header.
#[must_use]
pub fn caller_context(headers: &HeaderMap, cfg: &ResourceServerConfig) -> CallerContext {
    let mut builder = CallerContext::builder();

    if let Some(rpt) = header_str(headers, &cfg.rpt_header) {
        builder = builder.rpt(rpt.to_owned());
    }
    if let Some(sso) =
        cookie(headers, &cfg.sso_cookie).or_else(|| header_str(headers, &cfg.sso_header))
    {
        builder = builder.sso_token(sso.to_owned());
    }

    builder.build()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

/// HTTP status for an access decision.
#[must_use]
pub fn outcome_status(outcome: &DecisionOutcome) -> StatusCode {
    match outcome {
        DecisionOutcome::Success { .. } => StatusCode::OK,
        DecisionOutcome::NeedTicket(ticket) => match ticket.status {
            TicketStatus::Issued => StatusCode::UNAUTHORIZED,
            TicketStatus::Warning => StatusCode::FORBIDDEN,
        },
        DecisionOutcome::NotFound => StatusCode::NOT_FOUND,
        DecisionOutcome::NotRegistered
        | DecisionOutcome::MissingScopes
        | DecisionOutcome::InvalidScope => StatusCode::BAD_REQUEST,
        DecisionOutcome::Conflict => StatusCode::CONFLICT,
    }
}

fn relay_headers(res: &mut Response, relayed: &BTreeMap<String, String>) {
    for (name, value) in relayed {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            res.headers_mut().append(name, value);
        } else {
            warn!(header = %name, "dropping malformed relayed header");
        }
    }
}

/// Decide access to a shared resource
///
/// # Errors
///
/// Returns a problem response when the decision could not be made.
#[tracing::instrument(
    skip_all,
    fields(resource_uid = %id, outcome = Empty)
)]
pub async fn get_resource(
    Extension(svc): Extension<Arc<Service>>,
    Extension(cfg): Extension<Arc<ResourceServerConfig>>,
    Path(id): Path<String>,
    Query(query): Query<ScopesQuery>,
    headers: HeaderMap,
) -> Result<Response, Problem> {
    let ctx = caller_context(&headers, &cfg);
    let decision = svc.decide(&ctx, &id, &query.scopes).await?;

    let status = outcome_status(&decision.outcome);
    tracing::Span::current().record("outcome", decision.outcome.name());

    let relayed = if let DecisionOutcome::NeedTicket(ticket) = &decision.outcome {
        ticket.headers.clone()
    } else {
        BTreeMap::new()
    };

    let mut res = (status, Json(DecisionDto::from(decision))).into_response();
    relay_headers(&mut res, &relayed);
    Ok(res)
}

/// Revoke the caller's grant on a shared resource
///
/// # Errors
///
/// Returns a problem response when the caller is unknown, the resource is
/// missing or the policy could not be updated.
#[tracing::instrument(skip_all, fields(resource_uid = %id))]
pub async fn revoke_policy(
    Extension(svc): Extension<Arc<Service>>,
    Extension(cfg): Extension<Arc<ResourceServerConfig>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, Problem> {
    let ctx = caller_context(&headers, &cfg);
    let outcome = svc.revoke(&ctx, &id).await?;
    info!(status = ?outcome.status, "grant revoked");
    Ok(StatusCode::NO_CONTENT)
}
