//! Partner factory functions

use sitewit_domain::{Address, Partner, Result, SubPartnerRef, WhiteLabelSettings};

use crate::api::{CreatePartnerRequest, SiteWitService};

/// Create a sub-partner. The returned record carries its generated id and
/// token.
pub async fn create(
    service: &SiteWitService,
    name: &str,
    address: Address,
    settings: WhiteLabelSettings,
    remote_id: Option<&str>,
) -> Result<Partner> {
    let request =
        CreatePartnerRequest { name: name.to_string(), address, white_label_settings: settings };
    Partner::from_value(&service.create_partner(&request, remote_id).await?)
}

/// Fetch a sub-partner by either of its ids.
pub async fn get(service: &SiteWitService, subpartner: &SubPartnerRef) -> Result<Partner> {
    let response = match subpartner {
        SubPartnerRef::Id(id) => service.get_partner(Some(id), None).await?,
        SubPartnerRef::Remote(remote_id) => service.get_partner(None, Some(remote_id)).await?,
    };
    Partner::from_value(&response)
}

/// Fetch the calling partner itself.
pub async fn get_own(service: &SiteWitService) -> Result<Partner> {
    Partner::from_value(&service.get_partner(None, None).await?)
}
