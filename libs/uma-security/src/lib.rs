#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Caller identity carried through a single resource-server request.
//!
//! The HTTP boundary extracts the session token and the requesting party
//! token from transport headers and hands the domain layer a
//! [`CallerContext`]. Secrets never leave this type unredacted through
//! `Debug` or serialization.

pub mod context;

pub use context::{CallerContext, CallerContextBuilder};
