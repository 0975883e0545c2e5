//! Process-wide service handle
//!
//! Callers that do not want to thread a [`SiteWitService`] through their code
//! can use [`service`], which builds one from [`config::load`] on first use.

use once_cell::sync::OnceCell;
use sitewit_domain::Result;

use crate::api::SiteWitService;
use crate::config;

static SERVICE: OnceCell<SiteWitService> = OnceCell::new();

/// Shared service built from the loaded configuration.
///
/// A failed initialization is not cached; the next call retries.
pub fn service() -> Result<&'static SiteWitService> {
    SERVICE.get_or_try_init(|| {
        let config = config::load()?;
        tracing::info!(url = %config.url, "Initializing shared SiteWit service");
        SiteWitService::from_config(&config)
    })
}

/// Install a pre-built service as the shared handle.
///
/// Returns the rejected service if one is already installed.
pub fn install(service: SiteWitService) -> std::result::Result<(), SiteWitService> {
    SERVICE.set(service)
}
