//! Configuration for the static UMA plugin.

use resource_server_sdk::{Permission, TokenPermission};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Plugin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticUmaPluginConfig {
    /// Realm announced in `WWW-Authenticate` when a ticket is issued.
    pub realm: String,

    /// Issuer of the discovery document.
    pub issuer: String,

    /// Credential accepted for policy reads and writes.
    pub admin_credential: String,

    /// When `false`, permission requests answer with a warning instead of a ticket.
    pub ticket_service_available: bool,

    /// Protection API token of each resource owner.
    pub owner_tokens: Vec<OwnerToken>,

    pub resources: Vec<ResourceSeed>,

    pub registrations: Vec<RegistrationSeed>,

    pub policies: Vec<PolicySeed>,

    /// Requesting party tokens known to the introspection endpoint.
    pub tokens: Vec<TokenSeed>,

    /// SSO session tokens and the user behind each.
    pub sessions: Vec<SessionSeed>,
}

impl Default for StaticUmaPluginConfig {
    fn default() -> Self {
        Self {
            realm: "localhost".to_owned(),
            issuer: "http://localhost:8080".to_owned(),
            admin_credential: "admin-token".to_owned(),
            ticket_service_available: true,
            owner_tokens: Vec::new(),
            resources: Vec::new(),
            registrations: Vec::new(),
            policies: Vec::new(),
            tokens: Vec::new(),
            sessions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OwnerToken {
    pub owner: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceSeed {
    pub uid: String,
    pub owner: String,
    #[serde(default)]
    pub registration_id: String,
    #[serde(default)]
    pub discoverable: bool,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Content document, if the resource has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationSeed {
    pub id: String,
    pub resource_scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySeed {
    pub registration_id: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSeed {
    pub rpt: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub permissions: Vec<TokenPermission>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSeed {
    pub token: String,
    pub subject: String,
}
