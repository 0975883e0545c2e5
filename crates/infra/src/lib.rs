//! # SiteWit Infrastructure
//!
//! Async client for the SiteWit partner API.
//!
//! This crate contains:
//! - HTTP transport (reqwest) with timeouts and optional retries
//! - Partner auth header composition
//! - The endpoint-level [`SiteWitService`]
//! - Typed model operations (accounts, subscriptions, partners)
//! - Configuration loading from environment or file
//!
//! ## Architecture
//! - Domain types and errors live in `sitewit-domain`
//! - [`Transport`] is the seam between endpoint logic and I/O
//! - All network code is confined to this crate

pub mod api;
pub mod config;
pub mod errors;
pub mod global;
pub mod http;
pub mod models;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used items
pub use api::{
    AccountUpdate, AuthHeaderComposer, AuthHeaders, CampaignServiceRequest, CancelRequest,
    CreateAccountRequest, CreateCampaignRequest, CreatePartnerRequest, OwnerChange,
    PartnerCredentials, RefillRequest, RefundRequest, SiteWitService, SiteWitServiceBuilder,
    SubscribeRequest,
};
pub use errors::InfraError;
pub use http::{ApiRequest, HttpClient, HttpClientBuilder, HttpTransport, Transport};
