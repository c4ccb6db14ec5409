use resource_server_sdk::{AccessDecision, DecisionOutcome, ScopeSummary};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query parameters of the access endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ScopesQuery {
    /// Space-delimited scopes.
    #[serde(default)]
    pub scopes: String,
}

/// REST DTO for an access decision
#[derive(Debug, Clone, Serialize)]
pub struct DecisionDto {
    pub outcome: &'static str,
    pub message: String,
    pub scopes: ScopeSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl From<AccessDecision> for DecisionDto {
    fn from(decision: AccessDecision) -> Self {
        let mut dto = Self {
            outcome: decision.outcome.name(),
            message: decision.message,
            scopes: decision.scopes,
            ticket: None,
            as_uri: None,
            meta: None,
            content: None,
        };
        match decision.outcome {
            DecisionOutcome::Success { meta, content } => {
                dto.meta = meta;
                dto.content = content;
            }
            DecisionOutcome::NeedTicket(ticket) => {
                dto.ticket = ticket.ticket;
                dto.as_uri = ticket.as_uri;
            }
            _ => {}
        }
        dto
    }
}
