//! Campaign, billing and campaign-service enumerations

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SiteWitError};
use crate::impl_wire_key_conversions;

/// Advertising channel of a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CampaignType {
    Search,
    Display,
}

impl_wire_key_conversions!(CampaignType {
    Search => "search",
    Display => "display",
});

impl CampaignType {
    /// Name the API uses for campaign/subscription `type` fields
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Search => "SearchCampaign",
            Self::Display => "DisplayCampaign",
        }
    }
}

/// How a subscription gets charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingType {
    Automatic,
    Triggered,
}

/// When a cancellation takes effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelType {
    Immediate,
    EndOfCycle,
}

impl CancelType {
    pub const fn from_immediate(immediate: bool) -> Self {
        if immediate {
            Self::Immediate
        } else {
            Self::EndOfCycle
        }
    }
}

/// Managed services that can be ordered for an account's campaigns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CampaignServiceType {
    QuickStart,
    Difm,
}

impl_wire_key_conversions!(CampaignServiceType {
    QuickStart => "quickstart",
    Difm => "difm",
});

/// Display names the API expects for each campaign service.
pub const CAMPAIGN_SERVICES: &[(CampaignServiceType, &str)] = &[
    (CampaignServiceType::QuickStart, "QuickStart Campaign"),
    (CampaignServiceType::Difm, "DIFM Campaign"),
];

impl CampaignServiceType {
    /// Look up the API display name for this service.
    pub fn display_name(&self) -> Result<&'static str> {
        CAMPAIGN_SERVICES
            .iter()
            .find(|(service, _)| service == self)
            .map(|(_, name)| *name)
            .ok_or_else(|| {
                SiteWitError::invalid_argument(format!("no campaign service named for {self}"))
            })
    }
}

/// Resolve a campaign-service key (`"quickstart"`, `"difm"`) to the API name.
pub fn campaign_service_name(key: &str) -> Result<&'static str> {
    key.parse::<CampaignServiceType>()?.display_name()
}
