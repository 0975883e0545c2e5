//! Client configuration structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{API_BASE_URL, SANDBOX_API_BASE_URL};

/// Connection settings for the partner API.
///
/// Field names match the keys accepted in `sitewit.json` / `sitewit.toml`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteWitConfig {
    /// Base API URL, without a trailing path
    pub url: String,
    #[serde(alias = "affiliate_id")]
    pub partner_id: String,
    #[serde(alias = "affiliate_token")]
    pub partner_token: String,
    /// Per-request timeout enforced by the transport
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total transport attempts per call (1 = no retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl SiteWitConfig {
    /// Configuration pointing at the production API
    pub fn production(partner_id: impl Into<String>, partner_token: impl Into<String>) -> Self {
        Self::with_url(API_BASE_URL, partner_id, partner_token)
    }

    /// Configuration pointing at the sandbox API
    pub fn sandbox(partner_id: impl Into<String>, partner_token: impl Into<String>) -> Self {
        Self::with_url(SANDBOX_API_BASE_URL, partner_id, partner_token)
    }

    pub fn with_url(
        url: impl Into<String>,
        partner_id: impl Into<String>,
        partner_token: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            partner_id: partner_id.into(),
            partner_token: partner_token.into(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

// Keep the partner token out of logs.
impl fmt::Debug for SiteWitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteWitConfig")
            .field("url", &self.url)
            .field("partner_id", &self.partner_id)
            .field("partner_token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_use_expected_hosts() {
        assert_eq!(SiteWitConfig::production("p", "t").url, API_BASE_URL);
        assert_eq!(SiteWitConfig::sandbox("p", "t").url, SANDBOX_API_BASE_URL);
    }

    #[test]
    fn test_defaults_applied_when_missing() {
        let config: SiteWitConfig = serde_json::from_str(
            r#"{"url": "https://x", "partner_id": "42", "partner_token": "secret"}"#,
        )
        .unwrap();

        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn test_affiliate_key_aliases() {
        let config: SiteWitConfig = serde_json::from_str(
            r#"{"url": "https://x", "affiliate_id": "42", "affiliate_token": "secret"}"#,
        )
        .unwrap();

        assert_eq!(config.partner_id, "42");
        assert_eq!(config.partner_token, "secret");
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", SiteWitConfig::sandbox("42", "super-secret"));
        assert!(rendered.contains("42"));
        assert!(!rendered.contains("super-secret"));
    }
}
