//! Request bodies for create/update operations
//!
//! Optional fields are `Option`s skipped when `None`, so an absent value never
//! produces a key. The API offers no way to clear a field, and neither do
//! these types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::Value;
use sitewit_domain::constants::{DEFAULT_BUSINESS_TYPE, DEFAULT_TIME_ZONE, PREPURCHASE_CAMPAIGN_ID};
use sitewit_domain::utils::coerce::end_of_day;
use sitewit_domain::{
    Address, BillingType, CampaignServiceType, CampaignType, CancelType, Result, SiteWitError,
    WhiteLabelSettings,
};

use crate::errors::InfraError;

/// Serialize a payload into the JSON value handed to the transport.
pub fn to_body<T: Serialize>(payload: &T) -> Result<Value> {
    serde_json::to_value(payload).map_err(|err| {
        let infra: InfraError = err.into();
        SiteWitError::from(infra)
    })
}

fn serialize_end_of_day<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.serialize_str(&end_of_day(*date)),
        None => serializer.serialize_none(),
    }
}

/// Body of `POST /api/account/`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub url: String,
    business_type: &'static str,
    time_zone: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub name: String,
    pub email: String,
    pub currency: String,
    pub country_code: String,
    /// Attach the new account to an existing user instead of creating one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    /// Package the owner is subscribed to on the partner side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_package: Option<String>,
}

impl CreateAccountRequest {
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        currency: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            business_type: DEFAULT_BUSINESS_TYPE,
            time_zone: DEFAULT_TIME_ZONE,
            client_id: None,
            name: name.into(),
            email: email.into(),
            currency: currency.into(),
            country_code: country_code.into(),
            user_token: None,
            mobile_phone: None,
            user_package: None,
        }
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn user_token(mut self, user_token: impl Into<String>) -> Self {
        self.user_token = Some(user_token.into());
        self
    }

    pub fn mobile_phone(mut self, mobile_phone: impl Into<String>) -> Self {
        self.mobile_phone = Some(mobile_phone.into());
        self
    }

    pub fn user_package(mut self, user_package: impl Into<String>) -> Self {
        self.user_package = Some(user_package.into());
        self
    }
}

/// Partial update for `PUT /api/account/`. Only url, country and currency
/// can change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl AccountUpdate {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.country_code.is_none() && self.currency.is_none()
    }
}

/// Body of `PUT /api/account/clientId`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdUpdate {
    pub client_id: String,
}

/// New owner for an account: an existing user, or a user to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OwnerChange {
    Existing {
        #[serde(rename = "userToken")]
        user_token: String,
    },
    New {
        email: String,
        name: String,
    },
}

impl OwnerChange {
    pub fn existing(user_token: impl Into<String>) -> Self {
        Self::Existing { user_token: user_token.into() }
    }

    pub fn new_user(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self::New { email: email.into(), name: name.into() }
    }
}

/// Body of `POST /api/campaign/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreateCampaignRequest {
    #[serde(rename = "type", serialize_with = "serialize_campaign_type")]
    pub campaign_type: CampaignType,
}

fn serialize_campaign_type<S: Serializer>(
    campaign_type: &CampaignType,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(campaign_type.type_name())
}

/// Body of `POST /api/subscription/{type}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub campaign_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_type: Option<BillingType>,
    #[serde(
        rename = "nextCharge",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_end_of_day"
    )]
    pub expiry_date: Option<NaiveDate>,
}

impl SubscribeRequest {
    pub fn new(campaign_id: i64, budget: Decimal, currency: impl Into<String>) -> Self {
        Self { campaign_id, budget, currency: currency.into(), billing_type: None, expiry_date: None }
    }

    /// Subscription that makes the API create a pre-purchased campaign.
    pub fn prepurchase(budget: Decimal, currency: impl Into<String>) -> Self {
        Self::new(PREPURCHASE_CAMPAIGN_ID, budget, currency)
    }

    pub fn billing_type(mut self, billing_type: BillingType) -> Self {
        self.billing_type = Some(billing_type);
        self
    }

    pub fn expiry_date(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }
}

/// Body of `PUT /api/subscription/{type}`
///
/// `budget` and `currency` must match the existing subscription or the API
/// rejects the refill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefillRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub budget: Decimal,
    pub campaign_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub charged_spend: Decimal,
    pub currency: String,
    #[serde(
        rename = "nextCharge",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_end_of_day"
    )]
    pub expiry_date: Option<NaiveDate>,
}

/// Body of `DELETE /api/subscription/{type}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub campaign_id: i64,
    pub cancel_type: CancelType,
}

impl CancelRequest {
    pub fn new(campaign_id: i64, immediate: bool) -> Self {
        Self { campaign_id, cancel_type: CancelType::from_immediate(immediate) }
    }
}

/// Body of `DELETE /api/subscription/{type}/refund`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub campaign_id: i64,
}

/// Body of `POST /api/campaign/service`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignServiceRequest {
    pub service_type: &'static str,
    pub external_id: String,
}

impl CampaignServiceRequest {
    /// Fails if the service has no display name in the lookup table.
    pub fn new(service: CampaignServiceType, external_id: impl Into<String>) -> Result<Self> {
        Ok(Self { service_type: service.display_name()?, external_id: external_id.into() })
    }
}

/// Body of `POST /api/partner/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartnerRequest {
    pub name: String,
    pub address: Address,
    pub white_label_settings: WhiteLabelSettings,
}
