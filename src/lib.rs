//! # Kubernetes token source
//!
//! Client configuration for talking to a Kubernetes API server, with a
//! file-backed token cache that keeps rotating service-account tokens fresh
//! without reading the token file on every request.
//!
//! Modules:
//! - `cache` — time-bounded token cache over a mounted token file
//! - `config` — client configuration, in-cluster defaults, YAML loading
//! - `helpers` — clock abstraction
//! - `observability` — Prometheus metrics
//! - `utils` — logging and config bootstrap

pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::cache::token_cache::{TokenCache, DEFAULT_REFRESH_INTERVAL};
pub use crate::config::client::ClientConfig;
pub use crate::error::{AuthError, CredentialReadError};
pub use crate::helpers::time::{Clock, SystemClock};
