//! Campaign subscription records
//!
//! A subscription is a recurring budget commitment for one campaign. The
//! audit endpoint returns them grouped per account:
//!
//! ```json
//! [{"url": "...", "clientId": "...", "subscriptions": [{...}, ...]}]
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, SiteWitError};
use crate::utils::coerce::{
    date_from_timestamp, decimal_from_value, normalize_site_id, opaque_id_from_value,
};

/// A recurring budget commitment for a campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub site_id: Option<String>,
    pub url: String,
    /// Monthly ad budget (`budget` on the wire)
    pub ad_spend: Decimal,
    /// Service fee (`fee` on the wire)
    pub price: Decimal,
    pub campaign_id: String,
    pub currency: String,
    /// Next charge date; the subscription runs until then
    pub expiry_date: NaiveDate,
}

impl Subscription {
    /// Build a subscription from one raw item of an account's
    /// `subscriptions` list.
    ///
    /// An empty `site_id` means the account has no site and is stored as
    /// `None`.
    pub fn from_data(site_id: Option<&str>, url: impl Into<String>, data: &Value) -> Result<Self> {
        let ad_spend = decimal_from_value(required(data, "budget")?, "budget")?;
        let price = decimal_from_value(required(data, "fee")?, "fee")?;
        let campaign_id = opaque_id_from_value(required(data, "campaignId")?, "campaignId")?;

        let currency = required(data, "currency")?
            .as_str()
            .ok_or_else(|| SiteWitError::decode("currency: expected a string"))?
            .to_string();

        let next_charge = data
            .get("nextCharge")
            .or_else(|| data.get("nextBillDate"))
            .and_then(Value::as_str)
            .ok_or_else(|| SiteWitError::decode("subscription has no nextCharge/nextBillDate"))?;

        Ok(Self {
            site_id: normalize_site_id(site_id),
            url: url.into(),
            ad_spend,
            price,
            campaign_id,
            currency,
            expiry_date: date_from_timestamp(next_charge)?,
        })
    }
}

fn required<'a>(data: &'a Value, field: &str) -> Result<&'a Value> {
    data.get(field)
        .filter(|value| !value.is_null())
        .ok_or_else(|| SiteWitError::decode(format!("subscription has no {field}")))
}

/// One account's entry in the subscription audit listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSubscriptions {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub subscriptions: Vec<Value>,
}

impl AccountSubscriptions {
    /// Convert every raw subscription of this account into a typed record.
    pub fn into_subscriptions(self) -> Result<Vec<Subscription>> {
        let Self { url, client_id, subscriptions } = self;
        subscriptions
            .iter()
            .map(|data| Subscription::from_data(client_id.as_deref(), url.clone(), data))
            .collect()
    }
}
