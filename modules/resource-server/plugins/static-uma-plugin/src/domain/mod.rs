//! Domain layer for the static UMA plugin.

mod client;
pub mod service;

pub use service::Service;
