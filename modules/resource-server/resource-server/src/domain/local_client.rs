//! Local (in-process) client for the resource server.

use std::sync::Arc;

use async_trait::async_trait;
use resource_server_sdk::{
    AccessDecision, ResourceServerClient, ResourceServerError, RevokeOutcome,
};
use uma_security::CallerContext;

use super::{DomainError, Service};

/// Local client wrapping the service.
pub struct ResourceServerLocalClient {
    svc: Arc<Service>,
}

impl ResourceServerLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> ResourceServerError {
    tracing::error!(operation = op, error = ?e, "resource_server call failed");
    e.into()
}

#[async_trait]
impl ResourceServerClient for ResourceServerLocalClient {
    async fn decide(
        &self,
        ctx: &CallerContext,
        resource_uid: &str,
        scopes: &str,
    ) -> Result<AccessDecision, ResourceServerError> {
        self.svc
            .decide(ctx, resource_uid, scopes)
            .await
            .map_err(|e| log_and_convert("decide", e))
    }

    async fn revoke(
        &self,
        ctx: &CallerContext,
        resource_uid: &str,
    ) -> Result<RevokeOutcome, ResourceServerError> {
        self.svc
            .revoke(ctx, resource_uid)
            .await
            .map_err(|e| log_and_convert("revoke", e))
    }
}
