//! # quill_core
//!
//! Authentication core for Quill.

pub mod auth;
pub mod config;
pub mod models;
pub mod notify;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
