//! Domain layer for the resource server.

mod credentials;
pub mod engine;
pub mod error;
pub mod local_client;
pub mod policy;
pub mod reconciler;
pub mod scopes;
pub mod service;
pub mod ticket;
pub mod token;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod test_support;

pub use error::DomainError;
pub use local_client::ResourceServerLocalClient;
pub use service::{Collaborators, Service};
