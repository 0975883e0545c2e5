//! Account factory functions

use serde_json::Value;
use sitewit_domain::constants::{DEFAULT_COUNTRY_CODE, DEFAULT_CURRENCY};
use sitewit_domain::{Account, AccountOwner, Result, SiteWitError};
use tracing::{debug, instrument};

use crate::api::{AccountUpdate, CreateAccountRequest, OwnerChange, SiteWitService};

/// Optional inputs to [`create`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Caller's site identifier, stored as `clientId`
    pub site_id: Option<String>,
    /// Attach the account to this existing user instead of creating one
    pub user_token: Option<String>,
    pub mobile_phone: Option<String>,
    pub user_package: Option<String>,
}

/// Create an account owned by `owner`.
///
/// Name, email and sub-partner scope are derived from the owner; currency and
/// country are fixed to the defaults. If the site identifier is already bound
/// to an account, that account is returned.
#[instrument(skip(service, owner, options), fields(owner = owner.id()))]
pub async fn create<O>(
    service: &SiteWitService,
    owner: &O,
    url: &str,
    options: CreateOptions,
) -> Result<Account>
where
    O: AccountOwner + ?Sized,
{
    let mut request = CreateAccountRequest::new(
        url,
        owner.valid_user_name(),
        owner.contact_email(),
        DEFAULT_CURRENCY,
        DEFAULT_COUNTRY_CODE,
    );
    request.client_id = options.site_id;
    request.user_token = options.user_token;
    request.mobile_phone = options.mobile_phone;
    request.user_package = options.user_package;

    let response = service.create_account(&request, owner.remote_subpartner_id()).await?;
    let account = Account::from_envelope(&response)?;
    debug!(account_id = account.id, "account ready");
    Ok(account)
}

pub async fn get(service: &SiteWitService, account_token: &str) -> Result<Account> {
    Account::from_account_info(&service.get_account(account_token).await?)
}

pub async fn update(
    service: &SiteWitService,
    account_token: &str,
    update: &AccountUpdate,
) -> Result<Account> {
    Account::from_account_info(&service.update_account(account_token, update).await?)
}

/// Cancel the account; the returned record carries the canceled status.
pub async fn delete(service: &SiteWitService, account_token: &str) -> Result<Account> {
    Account::from_account_info(&service.delete_account(account_token).await?)
}

pub async fn set_site_id(
    service: &SiteWitService,
    account_token: &str,
    site_id: &str,
) -> Result<Account> {
    Account::from_account_info(&service.set_account_client_id(account_token, site_id).await?)
}

/// Hand the account over to a new user created from `owner`.
pub async fn associate_with_new_user<O>(
    service: &SiteWitService,
    account_token: &str,
    owner: &O,
) -> Result<Account>
where
    O: AccountOwner + ?Sized,
{
    let change = OwnerChange::new_user(owner.contact_email(), owner.valid_user_name());
    Account::from_envelope(&service.change_account_owner(account_token, &change).await?)
}

/// Hand the account over to an existing user.
pub async fn associate_with_existing_user(
    service: &SiteWitService,
    account_token: &str,
    user_token: &str,
) -> Result<Account> {
    let change = OwnerChange::existing(user_token);
    Account::from_envelope(&service.change_account_owner(account_token, &change).await?)
}

/// Single sign-on token for `user_token` on this account. The value is opaque.
pub async fn generate_sso_token(
    service: &SiteWitService,
    user_token: &str,
    account_token: &str,
) -> Result<String> {
    let response = service.generate_sso_token(user_token, account_token).await?;
    match &response {
        Value::String(token) => Ok(token.clone()),
        Value::Object(fields) => fields
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SiteWitError::decode("SSO response has no token")),
        other => Err(SiteWitError::decode(format!("unexpected SSO response: {other}"))),
    }
}
