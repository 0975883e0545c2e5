//! Domain records for accounts, campaigns, subscriptions and partners

pub mod account;
pub mod campaign;
pub mod partner;
pub mod subscription;

pub use account::{Account, AccountInfo, AccountOwner, AccountStatus, OwnerProfile, User, UserInfo};
pub use campaign::{
    campaign_service_name, BillingType, CampaignServiceType, CampaignType, CancelType,
    CAMPAIGN_SERVICES,
};
pub use partner::{Address, Partner, SubPartnerRef, WhiteLabelSettings};
pub use subscription::{AccountSubscriptions, Subscription};
