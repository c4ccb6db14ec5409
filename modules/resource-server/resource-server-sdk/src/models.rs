//! Models shared between the resource server and its collaborators.
//!
//! Collaborator payloads are parsed into these typed records once, at the
//! collaborator boundary; the decision engine only sees named fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A protected resource as kept by the resource store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Resource {
    pub uid: String,
    /// Resource owner (user id on the authorization server).
    pub owner: String,
    /// Id of the resource set registered with the authorization server.
    /// Empty when the resource was never registered.
    pub registration_id: String,
    pub discoverable: bool,
    /// Free-form metadata document.
    pub metadata: Map<String, Value>,
    /// Reference to the content document, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_ref: Option<String>,
}

/// Registration of a resource set on the authorization server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Registration {
    /// The full universe of scopes the resource supports.
    pub resource_scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
}

/// One subject's grant inside a policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    pub subject: String,
    pub scopes: Vec<String>,
}

impl Permission {
    #[must_use]
    pub fn new(subject: &str, scopes: &[&str]) -> Self {
        Self {
            subject: subject.to_owned(),
            scopes: scopes.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// Owner-approved grants for one resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Policy {
    pub permissions: Vec<Permission>,
}

/// One permission entry carried by a requesting party token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TokenPermission {
    pub resource_id: String,
    pub resource_scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Token introspection result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Introspection {
    pub active: bool,
    pub permissions: Vec<TokenPermission>,
}

/// Answer of the permission registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionRequestResult {
    /// Ticket created outright.
    Created {
        ticket: String,
        as_uri: Option<String>,
    },
    /// Regular UMA answer: the caller is not authorized yet, here is a ticket.
    NotAuthorized {
        ticket: String,
        headers: BTreeMap<String, String>,
    },
    /// The authorization server could not issue a ticket.
    Warning { headers: BTreeMap<String, String> },
}

/// Subset of the authorization server discovery document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WellKnown {
    pub issuer: String,
}

/// Whether a permission ticket was actually issued.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Issued,
    Warning,
}

/// Permission ticket to relay to the requesting party.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionTicket {
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_uri: Option<String>,
    /// Transport headers to relay verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

/// Scope sets computed while deciding, kept for diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScopeSummary {
    pub requested: Vec<String>,
    /// Scopes of the token permission entry matching the resource.
    pub token: Vec<String>,
    /// Scopes granted to the subject by the resource policy.
    pub policy: Vec<String>,
    /// Registration scopes; empty unless the resource is discoverable.
    pub resource: Vec<String>,
}

/// Terminal outcome of one access decision.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    /// Access granted. `meta`/`content` are present when requested.
    Success {
        meta: Option<Map<String, Value>>,
        content: Option<Value>,
    },
    /// No valid token; relay the ticket to the caller.
    NeedTicket(PermissionTicket),
    NotFound,
    NotRegistered,
    MissingScopes,
    InvalidScope,
    /// Requested scopes are partially covered by the subject's grant.
    Conflict,
}

impl DecisionOutcome {
    /// Stable upper-case name, as used in logs and response bodies.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Success { .. } => "SUCCESS",
            Self::NeedTicket(_) => "NEED_TICKET",
            Self::NotFound => "NOT_FOUND",
            Self::NotRegistered => "NOT_REGISTERED",
            Self::MissingScopes => "MISSING_SCOPES",
            Self::InvalidScope => "INVALID_SCOPE",
            Self::Conflict => "CONFLICT",
        }
    }
}

/// Result of [`crate::ResourceServerClient::decide`].
#[derive(Debug, Clone, PartialEq)]
pub struct AccessDecision {
    pub outcome: DecisionOutcome,
    /// Human-readable status line.
    pub message: String,
    pub scopes: ScopeSummary,
}

/// What the policy reconciler did.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RevokeStatus {
    /// The resource has no policy; nothing to revoke.
    NoPolicy,
    /// The subject held no grant; the policy was left as read.
    Unchanged,
    /// The policy was rewritten without the subject's grant.
    Replaced,
    /// The subject held the only grant; the policy was deleted.
    Deleted,
}

/// Result of [`crate::ResourceServerClient::revoke`]. All statuses are successes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevokeOutcome {
    pub status: RevokeStatus,
    /// Permissions left on the resource after the call.
    pub permissions: Vec<Permission>,
}

impl RevokeOutcome {
    /// `true` when the policy store was written to.
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self.status, RevokeStatus::Replaced | RevokeStatus::Deleted)
    }
}
