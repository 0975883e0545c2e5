//! White-label partner records

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, SiteWitError};

/// Postal address of a partner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    pub city: String,
    pub state_prov: String,
    pub country_code: String,
    pub postal_code: String,
}

/// Branding and feature settings applied to a partner's white-label UI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteLabelSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_app_primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_app_secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_app_logo_url: Option<String>,
    /// Enabled product features, e.g. `SEM`, `Connect`, `Analytics`
    #[serde(default)]
    pub features: Vec<String>,
}

/// A partner or sub-partner as returned by the partner endpoints
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    #[serde(default)]
    pub partner_id: Option<String>,
    #[serde(default)]
    pub partner_token: Option<String>,
    pub name: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub white_label_settings: Option<WhiteLabelSettings>,
}

impl Partner {
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| SiteWitError::decode(format!("partner: {e}")))
    }
}

impl fmt::Debug for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partner")
            .field("partner_id", &self.partner_id)
            .field("partner_token", &self.partner_token.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("address", &self.address)
            .field("white_label_settings", &self.white_label_settings)
            .finish()
    }
}

/// How a sub-partner is addressed: exactly one of the two ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubPartnerRef {
    /// Server-generated id
    Id(String),
    /// Caller-assigned id
    Remote(String),
}
