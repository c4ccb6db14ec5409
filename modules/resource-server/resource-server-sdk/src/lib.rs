#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! UMA Resource Server SDK
//!
//! This crate provides the public API for the `resource_server` module:
//!
//! - [`ResourceServerClient`] - Public API trait for consumers (access decision, revoke)
//! - [`plugin_api`] - Collaborator contracts the engine consumes (stores, authorization server)
//! - [`AccessDecision`], [`DecisionOutcome`], [`RevokeOutcome`] - Result models
//! - [`ResourceServerError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use resource_server_sdk::{DecisionOutcome, ResourceServerClient};
//!
//! let decision = client.decide(&ctx, "r1", "view download").await?;
//! match decision.outcome {
//!     DecisionOutcome::Success { .. } => { /* serve */ }
//!     DecisionOutcome::NeedTicket(ticket) => { /* relay ticket */ }
//!     _ => { /* reject */ }
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;

pub use api::ResourceServerClient;
pub use error::ResourceServerError;
pub use models::{
    AccessDecision, DecisionOutcome, Introspection, Permission, PermissionRequestResult,
    PermissionTicket, Policy, Registration, Resource, RevokeOutcome, RevokeStatus, ScopeSummary,
    TicketStatus, TokenPermission, WellKnown,
};
pub use plugin_api::{
    AccessTokenProvider, ContentStore, DiscoveryService, IdentityService, IntrospectionService,
    PermissionService, PolicyStore, RegistrationService, ResourceStore,
};
