#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use resource_server::{Collaborators, ResourceServerConfig, ResourceServerModule};
use resource_server_sdk::{Permission, TokenPermission};
use serde_json::json;
use static_uma_plugin::StaticUmaPluginConfig;
use static_uma_plugin::config::{
    OwnerToken, PolicySeed, RegistrationSeed, ResourceSeed, SessionSeed, TokenSeed,
};

pub const ISSUER: &str = "https://as.example.com";

/// `r1` owned by `bob`, registered as `reg-1` with scopes `view download`.
pub fn plugin_config() -> StaticUmaPluginConfig {
    StaticUmaPluginConfig {
        realm: "rs.example.com".to_owned(),
        issuer: ISSUER.to_owned(),
        owner_tokens: vec![OwnerToken {
            owner: "bob".to_owned(),
            token: "pat-bob".to_owned(),
        }],
        resources: vec![ResourceSeed {
            uid: "r1".to_owned(),
            owner: "bob".to_owned(),
            registration_id: "reg-1".to_owned(),
            discoverable: true,
            metadata: json!({"name": "Tax return"})
                .as_object()
                .cloned()
                .unwrap(),
            content: Some(json!({"total": 1234})),
        }],
        registrations: vec![RegistrationSeed {
            id: "reg-1".to_owned(),
            resource_scopes: vec!["view".to_owned(), "download".to_owned()],
            icon_uri: None,
        }],
        sessions: vec![SessionSeed {
            token: "sso-alice".to_owned(),
            subject: "alice".to_owned(),
        }],
        ..StaticUmaPluginConfig::default()
    }
}

pub fn with_policy(
    mut cfg: StaticUmaPluginConfig,
    permissions: Vec<Permission>,
) -> StaticUmaPluginConfig {
    cfg.policies.push(PolicySeed {
        registration_id: "reg-1".to_owned(),
        permissions,
    });
    cfg
}

pub fn with_token(
    mut cfg: StaticUmaPluginConfig,
    rpt: &str,
    scopes: &[&str],
) -> StaticUmaPluginConfig {
    cfg.tokens.push(TokenSeed {
        rpt: rpt.to_owned(),
        active: true,
        permissions: vec![TokenPermission {
            resource_id: "reg-1".to_owned(),
            resource_scopes: scopes.iter().map(|s| (*s).to_owned()).collect(),
            exp: None,
        }],
    });
    cfg
}

pub fn module(cfg: &StaticUmaPluginConfig) -> ResourceServerModule {
    let backend = Arc::new(static_uma_plugin::Service::from_config(cfg));
    ResourceServerModule::new(
        ResourceServerConfig::default(),
        Collaborators::from_single(&backend),
    )
}
