#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static UMA Plugin
//!
//! Implements every resource server collaborator (resource and content
//! stores, registration, policy, introspection, permission and discovery
//! endpoints, session and token lookups) from data seeded by configuration.
//! Policy writes mutate the in-memory state, so revocations are observable.
//!
//! ## Configuration
//!
//! ```yaml
//! static_uma_plugin:
//!   realm: "rs.example.com"
//!   issuer: "https://as.example.com"
//!   admin_credential: "admin-token"
//!   owner_tokens:
//!     - owner: bob
//!       token: pat-bob
//!   resources:
//!     - uid: r1
//!       owner: bob
//!       registration_id: reg-1
//!       discoverable: true
//!       metadata: { name: "Tax return" }
//!   registrations:
//!     - id: reg-1
//!       resource_scopes: [view, download]
//!   sessions:
//!     - token: sso-alice
//!       subject: alice
//! ```

pub mod config;
pub mod domain;

pub use config::StaticUmaPluginConfig;
pub use domain::Service;
