//! Account and owner types
//!
//! Accounts are built from the `accountInfo` / `userInfo` objects returned by
//! the account endpoints. Only the fields the client relies on are mapped;
//! everything else the server sends is ignored.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_USER_NAME, MAX_USER_NAME_LENGTH, MIN_USER_NAME_LENGTH};
use crate::errors::{Result, SiteWitError};

/// Account lifecycle status. The set is server-defined, so unknown values are
/// kept rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountStatus {
    Active,
    Canceled,
    Suspended,
    Other(String),
}

impl AccountStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Canceled => "Canceled",
            Self::Suspended => "Suspended",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for AccountStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Active" => Self::Active,
            "Canceled" | "Cancelled" => Self::Canceled,
            "Suspended" => Self::Suspended,
            _ => Self::Other(raw),
        }
    }
}

impl From<AccountStatus> for String {
    fn from(status: AccountStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for AccountStatus {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Owner of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    /// Opaque user token; may be shared by several accounts
    pub token: String,
}

/// A provisioned advertising account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Server-assigned account number
    pub id: i64,
    /// Capability credential for every account-scoped call
    pub token: String,
    pub status: AccountStatus,
    pub url: String,
    /// Caller's site identifier (`clientId` on the wire)
    pub site_id: Option<String>,
    pub currency: String,
    pub country_code: String,
    pub user: Option<User>,
}

/// `accountInfo` as sent by the API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub account_number: i64,
    pub token: String,
    pub status: AccountStatus,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub currency: String,
    #[serde(default, alias = "country")]
    pub country_code: String,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// `userInfo` as sent by the API
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl From<UserInfo> for User {
    fn from(info: UserInfo) -> Self {
        Self { name: info.name, email: info.email, token: info.token }
    }
}

impl Account {
    pub fn from_parts(info: AccountInfo, user: Option<UserInfo>) -> Self {
        Self {
            id: info.account_number,
            token: info.token,
            status: info.status,
            url: info.url,
            site_id: info.client_id.filter(|id| !id.is_empty()),
            currency: info.currency,
            country_code: info.country_code,
            user: user.map(User::from),
        }
    }

    /// Build an account from a bare `accountInfo` object (get/update/delete
    /// responses). These never carry owner details.
    pub fn from_account_info(account_info: &Value) -> Result<Self> {
        let info = AccountInfo::deserialize(account_info)
            .map_err(|e| SiteWitError::decode(format!("accountInfo: {e}")))?;
        Ok(Self::from_parts(info, None))
    }

    /// Build an account from an `{accountInfo, userInfo}` envelope.
    ///
    /// A missing or null `userInfo` yields an account without an owner.
    pub fn from_envelope(envelope: &Value) -> Result<Self> {
        let account_info = envelope
            .get("accountInfo")
            .ok_or_else(|| SiteWitError::decode("response has no accountInfo"))?;
        let info = AccountInfo::deserialize(account_info)
            .map_err(|e| SiteWitError::decode(format!("accountInfo: {e}")))?;

        let user = match envelope.get("userInfo") {
            None | Some(Value::Null) => None,
            Some(user_info) => Some(
                UserInfo::deserialize(user_info)
                    .map_err(|e| SiteWitError::decode(format!("userInfo: {e}")))?,
            ),
        };

        Ok(Self::from_parts(info, user))
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// The minimum an application user must expose to own a SiteWit account.
pub trait AccountOwner {
    /// Application-side user id
    fn id(&self) -> &str;

    fn full_name(&self) -> &str;

    fn email(&self) -> &str;

    /// Contact address configured for white-label users, preferred over
    /// [`email`](Self::email) when present.
    fn whitelabel_email(&self) -> Option<&str> {
        None
    }

    /// Partner the user belongs to; sent as the remote sub-partner id for
    /// white-label users.
    fn partner_id(&self) -> Option<&str>;

    fn is_whitelabel(&self) -> bool;

    /// Name accepted by the API: the full name when its length is within
    /// bounds, otherwise a generic placeholder.
    fn valid_user_name(&self) -> String {
        let name = self.full_name();
        let length = name.chars().count();
        if MIN_USER_NAME_LENGTH < length && length < MAX_USER_NAME_LENGTH {
            name.to_string()
        } else {
            DEFAULT_USER_NAME.to_string()
        }
    }

    fn contact_email(&self) -> &str {
        self.whitelabel_email().unwrap_or_else(|| self.email())
    }

    /// Remote sub-partner scope for account creation
    fn remote_subpartner_id(&self) -> Option<&str> {
        if self.is_whitelabel() {
            self.partner_id()
        } else {
            None
        }
    }
}

/// Plain owner record for callers that do not have their own user type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub whitelabel_email: Option<String>,
    pub partner_id: Option<String>,
    pub is_whitelabel: bool,
}

impl AccountOwner for OwnerProfile {
    fn id(&self) -> &str {
        &self.id
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn whitelabel_email(&self) -> Option<&str> {
        self.whitelabel_email.as_deref()
    }

    fn partner_id(&self) -> Option<&str> {
        self.partner_id.as_deref()
    }

    fn is_whitelabel(&self) -> bool {
        self.is_whitelabel
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn envelope() -> Value {
        json!({
            "accountInfo": {
                "accountNumber": 1,
                "token": "t",
                "status": "Active",
                "url": "x",
                "clientId": "c",
                "currency": "USD",
                "countryCode": "US",
                "timeZone": "GMT Standard Time",
                "jsCode": "jscode"
            },
            "userInfo": {
                "name": "A",
                "email": "a@b.com",
                "token": "ut",
                "roles": ["Owner", "Admin"]
            }
        })
    }

    #[test]
    fn test_from_envelope_maps_account_and_user() {
        let account = Account::from_envelope(&envelope()).unwrap();

        assert_eq!(account.id, 1);
        assert_eq!(account.token, "t");
        assert_eq!(account.status, "Active");
        assert_eq!(account.url, "x");
        assert_eq!(account.site_id.as_deref(), Some("c"));
        assert_eq!(account.currency, "USD");
        assert_eq!(account.country_code, "US");

        let user = account.user.unwrap();
        assert_eq!(user.name, "A");
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.token, "ut");
    }

    #[test]
    fn test_missing_or_null_user_info_is_tolerated() {
        let mut value = envelope();
        value["userInfo"] = Value::Null;
        assert!(Account::from_envelope(&value).unwrap().user.is_none());

        value.as_object_mut().unwrap().remove("userInfo");
        assert!(Account::from_envelope(&value).unwrap().user.is_none());
    }

    #[test]
    fn test_missing_account_info_is_decode_error() {
        let err = Account::from_envelope(&json!({"userInfo": null})).unwrap_err();
        assert!(matches!(err, SiteWitError::Decode(_)));
    }

    #[test]
    fn test_from_account_info_accepts_country_alias() {
        let account = Account::from_account_info(&json!({
            "accountNumber": 9999,
            "token": "token",
            "status": "Canceled",
            "url": "www.test.site.com",
            "country": "GB",
            "currency": "GBP",
            "clientId": ""
        }))
        .unwrap();

        assert_eq!(account.country_code, "GB");
        assert_eq!(account.status, AccountStatus::Canceled);
        assert!(account.site_id.is_none());
        assert!(!account.is_active());
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status = AccountStatus::from("PendingReview".to_string());
        assert_eq!(status, AccountStatus::Other("PendingReview".into()));
        assert_eq!(String::from(status), "PendingReview");
    }

    #[test]
    fn test_owner_name_fallback() {
        let mut owner = OwnerProfile {
            id: "7".into(),
            full_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            ..Default::default()
        };
        assert_eq!(owner.valid_user_name(), "Jane Doe");

        owner.full_name = "J".into();
        assert_eq!(owner.valid_user_name(), DEFAULT_USER_NAME);

        owner.full_name = "x".repeat(256);
        assert_eq!(owner.valid_user_name(), DEFAULT_USER_NAME);
    }

    #[test]
    fn test_owner_whitelabel_scope_and_email() {
        let owner = OwnerProfile {
            id: "7".into(),
            full_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            whitelabel_email: Some("jane@partner.example".into()),
            partner_id: Some("WL_PARTNER".into()),
            is_whitelabel: true,
        };
        assert_eq!(owner.contact_email(), "jane@partner.example");
        assert_eq!(owner.remote_subpartner_id(), Some("WL_PARTNER"));

        let direct = OwnerProfile { is_whitelabel: false, ..owner };
        assert_eq!(direct.remote_subpartner_id(), None);
    }
}
