//! SiteWit partner API client
//!
//! One method per remote operation. Each composes the auth headers for its
//! scope, serializes its body, issues exactly one transport call and returns
//! the parsed JSON. Non-2xx responses surface as [`SiteWitError::Http`];
//! nothing is retried at this level.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use sitewit_domain::{
    Address, CampaignServiceType, CampaignType, Result, SiteWitConfig, SiteWitError,
    SubPartnerRef, WhiteLabelSettings,
};
use tracing::{debug, info, instrument};

use super::auth::{AuthHeaderComposer, AuthHeaders, PartnerCredentials};
use super::payload::{
    to_body, AccountUpdate, CampaignServiceRequest, CancelRequest, ClientIdUpdate,
    CreateAccountRequest, CreateCampaignRequest, CreatePartnerRequest, OwnerChange,
    RefillRequest, RefundRequest, SubscribeRequest,
};
use crate::http::{ApiRequest, HttpClient, HttpTransport, Transport};

const ACCOUNT_PATH: &str = "/api/account/";
const ACCOUNT_CLIENT_ID_PATH: &str = "/api/account/clientId";
const ACCOUNT_OWNER_PATH: &str = "/api/account/owner";
const SSO_TOKEN_PATH: &str = "/api/sso/token";
const CAMPAIGN_PATH: &str = "/api/campaign/";
const CAMPAIGN_SERVICE_PATH: &str = "/api/campaign/service";
const CAMPAIGN_SUBSCRIPTION_PATH: &str = "/api/subscription/campaign/";
const AUDIT_SUBSCRIPTIONS_PATH: &str = "/api/audit/subscriptions";
const PARTNER_PATH: &str = "/api/partner/";
const PARTNER_ADDRESS_PATH: &str = "/api/partner/address";
const PARTNER_WHITELABEL_PATH: &str = "/api/partner/whitelabel";

fn campaign_path(campaign_id: i64) -> String {
    format!("{CAMPAIGN_PATH}{campaign_id}")
}

fn campaign_subscription_path(campaign_id: i64) -> String {
    format!("{CAMPAIGN_SUBSCRIPTION_PATH}{campaign_id}")
}

fn subscription_path(campaign_type: CampaignType) -> String {
    format!("/api/subscription/{}", campaign_type.key())
}

fn refund_path(campaign_type: CampaignType) -> String {
    format!("{}/refund", subscription_path(campaign_type))
}

/// Client for the SiteWit partner API.
///
/// Holds only credentials and a transport handle, so clones are cheap and can
/// be shared across tasks.
#[derive(Clone)]
pub struct SiteWitService {
    auth: AuthHeaderComposer,
    transport: Arc<dyn Transport>,
}

impl SiteWitService {
    /// Service over an explicit transport, e.g. a fake in tests.
    pub fn new(credentials: PartnerCredentials, transport: Arc<dyn Transport>) -> Self {
        Self { auth: AuthHeaderComposer::new(credentials), transport }
    }

    /// Build a service talking HTTPS to `config.url`.
    ///
    /// # Errors
    ///
    /// Returns `SiteWitError::Config` if the URL is invalid or the HTTP
    /// client cannot be created.
    pub fn from_config(config: &SiteWitConfig) -> Result<Self> {
        Self::builder().config(config.clone()).build()
    }

    /// Start building a service from config and an optional transport.
    pub fn builder() -> SiteWitServiceBuilder {
        SiteWitServiceBuilder::default()
    }

    /// Header composer used for every call.
    pub fn auth(&self) -> &AuthHeaderComposer {
        &self.auth
    }

    async fn call(&self, request: ApiRequest) -> Result<Value> {
        debug!(method = %request.method, path = %request.path, "calling SiteWit API");
        self.transport.send(request).await
    }

    fn account_request(&self, method: Method, path: impl Into<String>, token: &str) -> ApiRequest {
        ApiRequest::new(method, path).headers(self.auth.account_auth_header(token))
    }

    fn partner_request(
        &self,
        method: Method,
        path: impl Into<String>,
        headers: AuthHeaders,
    ) -> ApiRequest {
        ApiRequest::new(method, path).headers(headers)
    }

    /* ---------------------------------------------------------------------- */
    /* Accounts */
    /* ---------------------------------------------------------------------- */

    /// Create an account, optionally under a caller-assigned sub-partner.
    ///
    /// Reusing a site identifier returns the account already bound to it
    /// instead of failing.
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn create_account(
        &self,
        request: &CreateAccountRequest,
        remote_subpartner_id: Option<&str>,
    ) -> Result<Value> {
        let headers = self.auth.partner_auth_header(None, remote_subpartner_id)?;
        let body = to_body(request)?;
        let response =
            self.call(self.partner_request(Method::POST, ACCOUNT_PATH, headers).json(body)).await?;
        info!("account created");
        Ok(response)
    }

    /// Fetch the account's `accountInfo`. Owner details are not included.
    #[instrument(skip_all)]
    pub async fn get_account(&self, account_token: &str) -> Result<Value> {
        self.call(self.account_request(Method::GET, ACCOUNT_PATH, account_token)).await
    }

    /// Partially update an account. Fields left as `None` are not sent.
    #[instrument(skip_all)]
    pub async fn update_account(&self, account_token: &str, update: &AccountUpdate) -> Result<Value> {
        let body = to_body(update)?;
        self.call(self.account_request(Method::PUT, ACCOUNT_PATH, account_token).json(body)).await
    }

    /// Cancel an account. The record stays fetchable with a canceled status.
    #[instrument(skip_all)]
    pub async fn delete_account(&self, account_token: &str) -> Result<Value> {
        let response =
            self.call(self.account_request(Method::DELETE, ACCOUNT_PATH, account_token)).await?;
        info!("account deleted");
        Ok(response)
    }

    /// Bind the account to another site identifier (`clientId`).
    #[instrument(skip(self, account_token))]
    pub async fn set_account_client_id(&self, account_token: &str, client_id: &str) -> Result<Value> {
        let body = to_body(&ClientIdUpdate { client_id: client_id.to_string() })?;
        self.call(
            self.account_request(Method::PUT, ACCOUNT_CLIENT_ID_PATH, account_token).json(body),
        )
        .await
    }

    /// Attach an existing user, or a newly created one, as the account owner.
    #[instrument(skip_all)]
    pub async fn change_account_owner(&self, account_token: &str, owner: &OwnerChange) -> Result<Value> {
        let body = to_body(owner)?;
        self.call(self.account_request(Method::PUT, ACCOUNT_OWNER_PATH, account_token).json(body))
            .await
    }

    /// Request a single sign-on token for a user of the account.
    #[instrument(skip_all)]
    pub async fn generate_sso_token(&self, user_token: &str, account_token: &str) -> Result<Value> {
        self.call(
            self.account_request(Method::GET, SSO_TOKEN_PATH, account_token)
                .query("userToken", user_token),
        )
        .await
    }

    /* ---------------------------------------------------------------------- */
    /* Campaigns */
    /* ---------------------------------------------------------------------- */

    /// Create an empty campaign. Mostly useful for test setups; campaigns are
    /// normally built in the SiteWit UI.
    #[instrument(skip(self, account_token))]
    pub async fn create_campaign(
        &self,
        account_token: &str,
        campaign_type: CampaignType,
    ) -> Result<Value> {
        let body = to_body(&CreateCampaignRequest { campaign_type })?;
        self.call(self.account_request(Method::POST, CAMPAIGN_PATH, account_token).json(body)).await
    }

    /// Fetch one campaign of the account.
    #[instrument(skip(self, account_token))]
    pub async fn get_campaign(&self, account_token: &str, campaign_id: i64) -> Result<Value> {
        self.call(self.account_request(Method::GET, campaign_path(campaign_id), account_token)).await
    }

    /// All campaigns of the account.
    #[instrument(skip_all)]
    pub async fn list_campaigns(&self, account_token: &str) -> Result<Value> {
        self.call(self.account_request(Method::GET, CAMPAIGN_PATH, account_token)).await
    }

    /// Delete a campaign. Its subscription must be cancelled first.
    #[instrument(skip(self, account_token))]
    pub async fn delete_campaign(&self, account_token: &str, campaign_id: i64) -> Result<Value> {
        self.call(self.account_request(Method::DELETE, campaign_path(campaign_id), account_token))
            .await
    }

    /// Subscription attached to one campaign.
    #[instrument(skip(self, account_token))]
    pub async fn get_campaign_subscription(
        &self,
        account_token: &str,
        campaign_id: i64,
    ) -> Result<Value> {
        self.call(self.account_request(
            Method::GET,
            campaign_subscription_path(campaign_id),
            account_token,
        ))
        .await
    }

    /// Subscriptions of every campaign in the account.
    #[instrument(skip_all)]
    pub async fn list_campaign_subscriptions(&self, account_token: &str) -> Result<Value> {
        self.call(self.account_request(Method::GET, CAMPAIGN_SUBSCRIPTION_PATH, account_token))
            .await
    }

    /// Order a managed campaign service for the account.
    #[instrument(skip(self, account_token))]
    pub async fn request_campaign_service(
        &self,
        account_token: &str,
        service: CampaignServiceType,
        external_id: &str,
    ) -> Result<Value> {
        let body = to_body(&CampaignServiceRequest::new(service, external_id)?)?;
        self.call(
            self.account_request(Method::POST, CAMPAIGN_SERVICE_PATH, account_token).json(body),
        )
        .await
    }

    /* ---------------------------------------------------------------------- */
    /* Subscriptions */
    /* ---------------------------------------------------------------------- */

    /// Subscribe a campaign to a budget.
    ///
    /// The server decides what this means for the campaign's current state:
    /// a new subscription, an upgrade or downgrade of an active one, or the
    /// resumption of a cancelled one. Campaign id
    /// [`PREPURCHASE_CAMPAIGN_ID`](sitewit_domain::constants::PREPURCHASE_CAMPAIGN_ID)
    /// creates a pre-purchased campaign on the fly; see
    /// [`SubscribeRequest::prepurchase`].
    #[instrument(skip(self, account_token, request), fields(campaign_id = request.campaign_id))]
    pub async fn subscribe_to_campaign(
        &self,
        account_token: &str,
        campaign_type: CampaignType,
        request: &SubscribeRequest,
    ) -> Result<Value> {
        let body = to_body(request)?;
        let response = self
            .call(
                self.account_request(Method::POST, subscription_path(campaign_type), account_token)
                    .json(body),
            )
            .await?;
        info!(%campaign_type, "campaign subscribed");
        Ok(response)
    }

    /// Add a charge to an existing subscription.
    #[instrument(skip(self, account_token, request), fields(campaign_id = request.campaign_id))]
    pub async fn refill_campaign_subscription(
        &self,
        account_token: &str,
        campaign_type: CampaignType,
        request: &RefillRequest,
    ) -> Result<Value> {
        let body = to_body(request)?;
        self.call(
            self.account_request(Method::PUT, subscription_path(campaign_type), account_token)
                .json(body),
        )
        .await
    }

    /// Stop a subscription, immediately or at the end of the billing cycle.
    #[instrument(skip(self, account_token))]
    pub async fn cancel_campaign_subscription(
        &self,
        account_token: &str,
        campaign_type: CampaignType,
        campaign_id: i64,
        immediate: bool,
    ) -> Result<Value> {
        let body = to_body(&CancelRequest::new(campaign_id, immediate))?;
        let response = self
            .call(
                self.account_request(Method::DELETE, subscription_path(campaign_type), account_token)
                    .json(body),
            )
            .await?;
        info!("campaign subscription cancelled");
        Ok(response)
    }

    /// Refund a subscription whose campaign has not launched yet.
    #[instrument(skip(self, account_token))]
    pub async fn refund_campaign_subscription(
        &self,
        account_token: &str,
        campaign_type: CampaignType,
        campaign_id: i64,
    ) -> Result<Value> {
        let body = to_body(&RefundRequest { campaign_id })?;
        self.call(
            self.account_request(Method::DELETE, refund_path(campaign_type), account_token)
                .json(body),
        )
        .await
    }

    /// [`subscribe_to_campaign`](Self::subscribe_to_campaign) for a search campaign.
    pub async fn subscribe_to_search_campaign(
        &self,
        account_token: &str,
        request: &SubscribeRequest,
    ) -> Result<Value> {
        self.subscribe_to_campaign(account_token, CampaignType::Search, request).await
    }

    /// [`subscribe_to_campaign`](Self::subscribe_to_campaign) for a display campaign.
    pub async fn subscribe_to_display_campaign(
        &self,
        account_token: &str,
        request: &SubscribeRequest,
    ) -> Result<Value> {
        self.subscribe_to_campaign(account_token, CampaignType::Display, request).await
    }

    /// [`refill_campaign_subscription`](Self::refill_campaign_subscription) for a search
    /// campaign.
    pub async fn refill_search_campaign_subscription(
        &self,
        account_token: &str,
        request: &RefillRequest,
    ) -> Result<Value> {
        self.refill_campaign_subscription(account_token, CampaignType::Search, request).await
    }

    /// [`refill_campaign_subscription`](Self::refill_campaign_subscription) for a display
    /// campaign.
    pub async fn refill_display_campaign_subscription(
        &self,
        account_token: &str,
        request: &RefillRequest,
    ) -> Result<Value> {
        self.refill_campaign_subscription(account_token, CampaignType::Display, request).await
    }

    /// [`cancel_campaign_subscription`](Self::cancel_campaign_subscription) for a search
    /// campaign.
    pub async fn cancel_search_campaign_subscription(
        &self,
        account_token: &str,
        campaign_id: i64,
        immediate: bool,
    ) -> Result<Value> {
        self.cancel_campaign_subscription(account_token, CampaignType::Search, campaign_id, immediate)
            .await
    }

    /// [`cancel_campaign_subscription`](Self::cancel_campaign_subscription) for a display
    /// campaign.
    pub async fn cancel_display_campaign_subscription(
        &self,
        account_token: &str,
        campaign_id: i64,
        immediate: bool,
    ) -> Result<Value> {
        self.cancel_campaign_subscription(
            account_token,
            CampaignType::Display,
            campaign_id,
            immediate,
        )
        .await
    }

    /// [`refund_campaign_subscription`](Self::refund_campaign_subscription) for a search
    /// campaign.
    pub async fn refund_search_campaign_subscription(
        &self,
        account_token: &str,
        campaign_id: i64,
    ) -> Result<Value> {
        self.refund_campaign_subscription(account_token, CampaignType::Search, campaign_id).await
    }

    /// [`refund_campaign_subscription`](Self::refund_campaign_subscription) for a display
    /// campaign.
    pub async fn refund_display_campaign_subscription(
        &self,
        account_token: &str,
        campaign_id: i64,
    ) -> Result<Value> {
        self.refund_campaign_subscription(account_token, CampaignType::Display, campaign_id).await
    }

    /// One page of the partner-wide subscription audit, grouped per account.
    #[instrument(skip(self))]
    pub async fn list_subscriptions(&self, offset: u32, limit: u32) -> Result<Value> {
        let headers = self.auth.partner_auth_header(None, None)?;
        self.call(
            self.partner_request(Method::GET, AUDIT_SUBSCRIPTIONS_PATH, headers)
                .query("limit", limit)
                .query("skip", offset),
        )
        .await
    }

    /* ---------------------------------------------------------------------- */
    /* Partners */
    /* ---------------------------------------------------------------------- */

    /// Create a sub-partner. With a remote id, later calls can address it by
    /// that id instead of the generated one.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_partner(
        &self,
        request: &CreatePartnerRequest,
        remote_subpartner_id: Option<&str>,
    ) -> Result<Value> {
        let headers = self.auth.partner_auth_header(None, remote_subpartner_id)?;
        let body = to_body(request)?;
        let response =
            self.call(self.partner_request(Method::POST, PARTNER_PATH, headers).json(body)).await?;
        info!("partner created");
        Ok(response)
    }

    /// Fetch the partner itself, or a sub-partner by exactly one of its ids.
    #[instrument(skip(self))]
    pub async fn get_partner(
        &self,
        subpartner_id: Option<&str>,
        remote_subpartner_id: Option<&str>,
    ) -> Result<Value> {
        let headers = self.auth.partner_auth_header(subpartner_id, remote_subpartner_id)?;
        self.call(self.partner_request(Method::GET, PARTNER_PATH, headers)).await
    }

    /// Replace a sub-partner's postal address.
    #[instrument(skip(self, address))]
    pub async fn update_partner_address(
        &self,
        subpartner: &SubPartnerRef,
        address: &Address,
    ) -> Result<Value> {
        let headers = self.auth.subpartner_auth_header(subpartner);
        let body = to_body(address)?;
        self.call(self.partner_request(Method::PUT, PARTNER_ADDRESS_PATH, headers).json(body)).await
    }

    /// Replace a sub-partner's white-label settings.
    #[instrument(skip(self, settings))]
    pub async fn update_partner_settings(
        &self,
        subpartner: &SubPartnerRef,
        settings: &WhiteLabelSettings,
    ) -> Result<Value> {
        let headers = self.auth.subpartner_auth_header(subpartner);
        let body = to_body(settings)?;
        self.call(self.partner_request(Method::PUT, PARTNER_WHITELABEL_PATH, headers).json(body))
            .await
    }
}

/// Builder for [`SiteWitService`]
#[derive(Default)]
pub struct SiteWitServiceBuilder {
    config: Option<SiteWitConfig>,
    transport: Option<Arc<dyn Transport>>,
}

impl SiteWitServiceBuilder {
    /// Credentials, base URL and transport settings.
    pub fn config(mut self, config: SiteWitConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom transport instead of the HTTPS one built from the config.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// # Errors
    ///
    /// Returns `SiteWitError::Config` if no configuration was given or the
    /// HTTP transport cannot be built from it.
    pub fn build(self) -> Result<SiteWitService> {
        let config =
            self.config.ok_or_else(|| SiteWitError::Config("SiteWit config not set".into()))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let http = HttpClient::builder()
                    .timeout(Duration::from_secs(config.timeout_secs))
                    .max_attempts(config.max_attempts)
                    .build()?;
                Arc::new(HttpTransport::new(&config.url, http)?) as Arc<dyn Transport>
            }
        };

        let credentials = PartnerCredentials::new(config.partner_id, config.partner_token);
        Ok(SiteWitService::new(credentials, transport))
    }
}
