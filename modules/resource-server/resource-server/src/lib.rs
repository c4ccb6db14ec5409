//! UMA Resource Server Module
//!
//! Decides access to protected resources on behalf of their owners and lets
//! requesting parties revoke their own grants. All state lives behind the
//! collaborator traits of `resource_server_sdk`; this crate holds the
//! decision logic and the REST boundary.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod module;

pub use config::ResourceServerConfig;
pub use domain::{Collaborators, Service};
pub use module::ResourceServerModule;
