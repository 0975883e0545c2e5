//! Typed operations over [`SiteWitService`](crate::api::SiteWitService)
//!
//! These functions call the service and turn its JSON into domain records.

pub mod account;
pub mod partner;
pub mod subscription;

pub use subscription::{iter_subscriptions, iter_subscriptions_with_page_size};
