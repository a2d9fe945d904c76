//! # Taskdeck Shared Library
//!
//! This crate contains the domain types and pure business rules shared by
//! every Taskdeck client surface.
//!
//! ## Module Organization
//!
//! - `models`: remote entities, input payloads, filters, and response envelopes
//! - `auth`: the authorization policy (capabilities and list visibility)
//!
//! Nothing in this crate performs I/O. Everything that talks to the network
//! lives in `taskdeck-client`.

pub mod auth;
pub mod models;

/// Current version of the Taskdeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
