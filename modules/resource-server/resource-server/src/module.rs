//! Resource server module wiring.

use std::sync::Arc;

use axum::Router;
use resource_server_sdk::ResourceServerClient;
use tracing::info;

use crate::api::rest;
use crate::config::ResourceServerConfig;
use crate::domain::{Collaborators, ResourceServerLocalClient, Service};

/// Resource server module.
///
/// Built once at startup from its config and collaborators. Hands out the
/// in-process client and the REST router; both share one [`Service`].
pub struct ResourceServerModule {
    config: Arc<ResourceServerConfig>,
    service: Arc<Service>,
}

impl ResourceServerModule {
    #[must_use]
    pub fn new(config: ResourceServerConfig, collaborators: Collaborators) -> Self {
        info!(
            rpt_header = %config.rpt_header,
            sso_cookie = %config.sso_cookie,
            "Initializing resource-server module"
        );
        let service = Arc::new(Service::new(collaborators, &config));
        Self {
            config: Arc::new(config),
            service,
        }
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn ResourceServerClient> {
        Arc::new(ResourceServerLocalClient::new(self.service.clone()))
    }

    #[must_use]
    pub fn router(&self) -> Router {
        rest::router(self.service.clone(), self.config.clone())
    }

    #[must_use]
    pub fn config(&self) -> &ResourceServerConfig {
        &self.config
    }
}
