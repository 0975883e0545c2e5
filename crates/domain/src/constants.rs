//! Wire-level constants shared by the client and its models

/// Production partner API base URL
pub const API_BASE_URL: &str = "https://papi.sitewit.com";

/// Sandbox partner API base URL
pub const SANDBOX_API_BASE_URL: &str = "https://sandboxpapi.sitewit.com";

/// Header carrying the base64 partner credential
pub const PARTNER_AUTH_HEADER: &str = "PartnerAuth";

/// Header carrying the base64 caller-assigned sub-partner id
pub const REMOTE_SUBPARTNER_ID_HEADER: &str = "RemoteSubPartnerId";

// Only GMT is supported, so the time zone is not exposed at the model level.
pub const DEFAULT_TIME_ZONE: &str = "GMT Standard Time";

pub const DEFAULT_BUSINESS_TYPE: &str = "SMB";

/// Currency used when accounts are created through the model layer
pub const DEFAULT_CURRENCY: &str = "USD";

/// Country used when accounts are created through the model layer
pub const DEFAULT_COUNTRY_CODE: &str = "US";

/// Fallback owner name when the real one is rejected by the API length rules
pub const DEFAULT_USER_NAME: &str = "User";

/// Names must be strictly between these lengths to be accepted upstream.
pub const MIN_USER_NAME_LENGTH: usize = 1;
pub const MAX_USER_NAME_LENGTH: usize = 256;

/// Page size used when draining the subscription audit endpoint
pub const SUBSCRIPTIONS_PAGE_SIZE: u32 = 100;

/// Subscribing to this campaign id makes the API create a pre-purchased
/// campaign on the fly.
pub const PREPURCHASE_CAMPAIGN_ID: i64 = -1;

/// Fixed time appended to expiry dates sent to the API
pub const END_OF_DAY_TIME: &str = "23:59:59";
