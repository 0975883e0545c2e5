//! # SiteWit Domain
//!
//! Value types for the SiteWit partner API client.
//!
//! This crate contains:
//! - Account, subscription, campaign and partner records
//! - The error taxonomy and `Result` alias
//! - Client configuration
//! - Wire constants and JSON coercion helpers
//!
//! ## Architecture
//! - No I/O; transport and service code live in `sitewit-infra`
//! - Only external dependencies allowed

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

pub use config::*;
pub use errors::*;
pub use types::*;
