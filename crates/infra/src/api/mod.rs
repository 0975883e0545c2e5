//! SiteWit partner API
//!
//! - [`auth`]: `PartnerAuth` / `RemoteSubPartnerId` header composition
//! - [`payload`]: request bodies with absent-field omission
//! - [`client`]: [`SiteWitService`], one method per remote operation

pub mod auth;
pub mod client;
pub mod payload;

pub use auth::{AuthHeaderComposer, AuthHeaders, PartnerCredentials};
pub use client::{SiteWitService, SiteWitServiceBuilder};
pub use payload::{
    AccountUpdate, CampaignServiceRequest, CancelRequest, CreateAccountRequest,
    CreateCampaignRequest, CreatePartnerRequest, OwnerChange, RefillRequest, RefundRequest,
    SubscribeRequest,
};
