//! # onboard-core
//!
//! Core types and utilities shared by the dashboard onboarding crates.
//!
//! ## Modules
//!
//! - [`error`] - Error type, error codes and process exit codes
//! - [`ids`] - Strongly-typed identifiers for dashboard resources
//! - [`endpoint`] - Shard endpoint resolution
//! - [`lookup`] - Tri-state lookup results (found / absent / failed)
//! - [`config`] - Run configuration and onboarding policy
//! - [`client`] - HTTP client tuning

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod ids;
pub mod lookup;

// Re-export commonly used types
pub use endpoint::ShardEndpoint;
pub use error::{Error, Result};
pub use lookup::Lookup;
