//! Subscription listing and pagination
//!
//! The audit endpoint is offset-paginated: pages are requested with
//! `skip = offset` and stop once a page comes back shorter than the limit.
//! Accounts created or removed during a walk can shift page boundaries, so a
//! walk may skip or repeat entries under concurrent changes.

use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;
use sitewit_domain::constants::SUBSCRIPTIONS_PAGE_SIZE;
use sitewit_domain::{AccountSubscriptions, Result, SiteWitError, Subscription};
use tracing::debug;

use crate::api::SiteWitService;
use crate::errors::InfraError;

/// Every subscription across all accounts, fetched lazily page by page.
///
/// Each call starts a fresh walk from offset 0. Dropping the stream stops it.
pub fn iter_subscriptions(
    service: &SiteWitService,
) -> impl Stream<Item = Result<Subscription>> + Send + '_ {
    iter_subscriptions_with_page_size(service, SUBSCRIPTIONS_PAGE_SIZE)
}

/// Same as [`iter_subscriptions`] with an explicit page size (minimum 1).
pub fn iter_subscriptions_with_page_size(
    service: &SiteWitService,
    limit: u32,
) -> impl Stream<Item = Result<Subscription>> + Send + '_ {
    let limit = limit.max(1);

    stream::try_unfold(Some(0u32), move |offset| async move {
        let Some(offset) = offset else {
            return Ok(None);
        };

        let groups = decode_page(service.list_subscriptions(offset, limit).await?)?;
        let page_len = groups.len();
        debug!(offset, limit, accounts = page_len, "fetched subscription page");

        let next = if page_len < limit as usize { None } else { Some(offset.saturating_add(limit)) };

        let subscriptions: Vec<Result<Subscription>> = groups
            .into_iter()
            .flat_map(|group| match group.into_subscriptions() {
                Ok(items) => items.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(err) => vec![Err(err)],
            })
            .collect();

        Ok::<_, SiteWitError>(Some((stream::iter(subscriptions), next)))
    })
    .try_flatten()
}

/// Fetch one page and convert it, without walking further.
pub async fn list_page(
    service: &SiteWitService,
    offset: u32,
    limit: u32,
) -> Result<Vec<Subscription>> {
    let groups = decode_page(service.list_subscriptions(offset, limit).await?)?;
    let mut subscriptions = Vec::new();
    for group in groups {
        subscriptions.extend(group.into_subscriptions()?);
    }
    Ok(subscriptions)
}

fn decode_page(page: Value) -> Result<Vec<AccountSubscriptions>> {
    if page.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(page).map_err(|err| {
        let infra: InfraError = err.into();
        SiteWitError::from(infra)
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::StreamExt;
    use serde_json::json;

    use super::*;
    use crate::api::PartnerCredentials;
    use crate::testing::RecordingTransport;

    fn page(accounts: usize, first_campaign: usize) -> Value {
        Value::Array(
            (0..accounts)
                .map(|i| {
                    json!({
                        "url": format!("http://site{}.example", first_campaign + i),
                        "clientId": "",
                        "subscriptions": [{
                            "budget": "100.0",
                            "fee": "10.0",
                            "campaignId": first_campaign + i,
                            "currency": "USD",
                            "nextCharge": "2020-01-31T00:00:00"
                        }]
                    })
                })
                .collect(),
        )
    }

    fn service(transport: &Arc<RecordingTransport>) -> SiteWitService {
        SiteWitService::new(PartnerCredentials::new("P", "S"), transport.clone())
    }

    #[tokio::test]
    async fn test_drains_pages_until_short_page() {
        let transport = Arc::new(RecordingTransport::with_responses([
            Ok(page(100, 0)),
            Ok(page(100, 100)),
            Ok(page(37, 200)),
        ]));
        let service = service(&transport);

        let subscriptions: Vec<Subscription> =
            iter_subscriptions(&service).try_collect().await.unwrap();

        assert_eq!(subscriptions.len(), 237);
        let ids: Vec<String> = subscriptions.iter().map(|s| s.campaign_id.clone()).collect();
        let expected: Vec<String> = (0..237).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        let skips: Vec<&str> = requests
            .iter()
            .map(|r| r.query.iter().find(|(k, _)| k == "skip").map(|(_, v)| v.as_str()).unwrap())
            .collect();
        assert_eq!(skips, ["0", "100", "200"]);
    }

    #[tokio::test]
    async fn test_full_last_page_needs_one_empty_page() {
        let transport = Arc::new(RecordingTransport::with_responses([
            Ok(page(2, 0)),
            Ok(json!([])),
        ]));
        let service = service(&transport);

        let subscriptions: Vec<Subscription> =
            iter_subscriptions_with_page_size(&service, 2).try_collect().await.unwrap();

        assert_eq!(subscriptions.len(), 2);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_stream_is_lazy_and_restartable() {
        let transport = Arc::new(RecordingTransport::with_responses([
            Ok(page(3, 0)),
            Ok(page(3, 0)),
        ]));
        let service = service(&transport);

        let stream = iter_subscriptions(&service);
        assert!(transport.requests().is_empty());

        let first: Vec<_> = stream.take(1).collect().await;
        assert_eq!(first.len(), 1);

        let again: Vec<Subscription> = iter_subscriptions(&service).try_collect().await.unwrap();
        assert_eq!(again.len(), 3);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.query.contains(&("skip".to_string(), "0".to_string()))));
    }

    #[tokio::test]
    async fn test_transport_error_ends_stream() {
        let transport = Arc::new(RecordingTransport::with_responses([Err(SiteWitError::Network(
            "connection reset".into(),
        ))]));
        let service = service(&transport);

        let result: Result<Vec<Subscription>> = iter_subscriptions(&service).try_collect().await;
        assert!(matches!(result, Err(SiteWitError::Network(_))));
    }

    #[tokio::test]
    async fn test_list_page_converts_single_page() {
        let transport = Arc::new(RecordingTransport::with_responses([Ok(page(2, 5))]));
        let subscriptions = list_page(&service(&transport), 0, 10).await.unwrap();

        assert_eq!(subscriptions.len(), 2);
        assert_eq!(subscriptions[0].campaign_id, "5");
        assert!(subscriptions[0].site_id.is_none());
    }
}
