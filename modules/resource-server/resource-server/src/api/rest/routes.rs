use std::sync::Arc;

use axum::routing::{delete, get};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::config::ResourceServerConfig;
use crate::domain::Service;

/// Routes of the share endpoints.
#[must_use]
pub fn router(service: Arc<Service>, config: Arc<ResourceServerConfig>) -> Router {
    Router::new()
        // GET /share/resources/{id}?scopes=... - Decide access
        .route("/share/resources/{id}", get(handlers::get_resource))
        // DELETE /share/resources/{id}/policy - Revoke own grant
        .route(
            "/share/resources/{id}/policy",
            delete(handlers::revoke_policy),
        )
        .layer(Extension(service))
        .layer(Extension(config))
}
