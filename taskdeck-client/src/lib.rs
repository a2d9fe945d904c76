//! # Taskdeck Client
//!
//! Headless client SDK for the Taskdeck project-management API: typed domain
//! services over a configured HTTP transport, a staleness-window query cache
//! with mutation-driven invalidation, role-scoped visibility filtering, and
//! persisted session/preference stores. A UI embeds [`client::TaskdeckClient`]
//! and renders what the façades return.
//!
//! ## Modules
//!
//! - `client`: the assembled client
//! - `config`: environment-driven configuration
//! - `transport`: the HTTP transport and its trait seam
//! - `services`: one typed function per remote operation
//! - `cache`: the entity cache layer
//! - `queries`: per-domain query/mutation façades
//! - `store`: session and UI-preference state with durable persistence
//! - `notify`: the notice/redirect sink the UI registers
//! - `error`: the unified error type

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod queries;
pub mod services;
pub mod store;
pub mod transport;

pub use client::TaskdeckClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};

/// Current version of the Taskdeck client library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
