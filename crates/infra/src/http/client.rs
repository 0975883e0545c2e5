//! Retrying reqwest client for partner API calls
//!
//! Each attempt rebuilds the outgoing request from the [`ApiRequest`], so
//! bodies never need to be cloned out of a consumed builder.

use std::time::Duration;

use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use sitewit_domain::{Result, SiteWitError};
use tracing::{debug, warn};
use url::Url;

use super::transport::ApiRequest;
use crate::errors::InfraError;

const USER_AGENT: &str = concat!("sitewit-client/", env!("CARGO_PKG_VERSION"));

/// Upper bound on the backoff exponent (base * 2^8).
const MAX_BACKOFF_SHIFT: usize = 8;

/// HTTP client with a per-request timeout and opt-in retries.
///
/// Defaults to a single attempt per call. With
/// [`HttpClientBuilder::max_attempts`] above one, connection failures,
/// timeouts and 5xx responses are retried with exponential backoff. Any other
/// response is returned as-is for the transport to classify.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with a 30 second timeout and a single attempt.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Total attempts per call, including the first.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Send `request` to `url`, retrying transient failures.
    ///
    /// Returns the final response whatever its status; only transport-level
    /// failures become errors.
    pub async fn execute(&self, url: &Url, request: &ApiRequest) -> Result<Response> {
        let mut attempt = 1;

        loop {
            debug!(method = %request.method, path = %request.path, attempt, "sending SiteWit request");
            let outcome = self.compose(url, request).send().await;

            let reason = match &outcome {
                Ok(response) if response.status().is_server_error() => {
                    Some(format!("status {}", response.status().as_u16()))
                }
                Ok(_) => None,
                Err(err) if err.is_timeout() => Some("timeout".to_string()),
                Err(err) if err.is_connect() => Some("connection failure".to_string()),
                Err(_) => None,
            };

            match reason {
                Some(reason) if attempt < self.max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        %reason,
                        "retrying SiteWit request"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                _ => {
                    return outcome.map_err(|err| {
                        let infra: InfraError = err.into();
                        SiteWitError::from(infra)
                    })
                }
            }
        }
    }

    fn compose(&self, url: &Url, request: &ApiRequest) -> RequestBuilder {
        let mut builder = self.client.request(request.method.clone(), url.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
    }

    fn backoff_delay(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(MAX_BACKOFF_SHIFT) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), max_attempts: 1, base_backoff: Duration::from_millis(200) }
    }
}

impl HttpClientBuilder {
    /// Per-request timeout covering connect and response.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts (initial try + retries). Zero is treated as one.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Delay before the first retry; doubles on each further retry.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// # Errors
    ///
    /// Returns `SiteWitError::Config` if the TLS backend cannot be initialized.
    pub fn build(self) -> Result<HttpClient> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| SiteWitError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client, max_attempts: self.max_attempts, base_backoff: self.base_backoff })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reqwest::{Method, StatusCode};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn retrying_client() -> HttpClient {
        HttpClient::builder()
            .base_backoff(Duration::from_millis(10))
            .max_attempts(3)
            .build()
            .expect("http client")
    }

    fn audit_url(server: &MockServer) -> Url {
        Url::parse(&format!("{}/api/audit/subscriptions", server.uri())).unwrap()
    }

    fn audit_request() -> ApiRequest {
        ApiRequest::new(Method::GET, "/api/audit/subscriptions")
    }

    #[tokio::test]
    async fn default_client_makes_a_single_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().expect("http client");
        assert_eq!(client.max_attempts(), 1);

        let response = client.execute(&audit_url(&server), &audit_request()).await.expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn composes_query_headers_and_body_on_every_attempt() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("PUT"))
            .and(path("/api/subscription/search"))
            .and(query_param("limit", "5"))
            .and(header("PartnerAuth", "abc"))
            .and(body_json(json!({"campaignId": 7})))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                if attempts_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(502)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .expect(2)
            .mount(&server)
            .await;

        let request = ApiRequest::new(Method::PUT, "/api/subscription/search")
            .query("limit", 5)
            .headers([("PartnerAuth", "abc")])
            .json(json!({"campaignId": 7}));
        let url = Url::parse(&format!("{}/api/subscription/search", server.uri())).unwrap();

        let response = retrying_client().execute(&url, &request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let response =
            retrying_client().execute(&audit_url(&server), &audit_request()).await.expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let response =
            retrying_client().execute(&audit_url(&server), &audit_request()).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = Url::parse(&format!("http://{addr}/api/account/")).unwrap();

        let client = HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .max_attempts(2)
            .build()
            .expect("http client");

        let result = client.execute(&url, &ApiRequest::new(Method::GET, "/api/account/")).await;
        match result {
            Err(SiteWitError::Network(msg)) => assert!(msg.to_lowercase().contains("connection")),
            other => panic!("expected network error, got {:?}", other.map(|r| r.status())),
        }
    }

    #[test]
    fn backoff_doubles_and_is_capped() {
        let client = HttpClient::builder().base_backoff(Duration::from_millis(10)).build().unwrap();
        assert_eq!(client.backoff_delay(1), Duration::from_millis(10));
        assert_eq!(client.backoff_delay(3), Duration::from_millis(40));
        assert_eq!(client.backoff_delay(20), Duration::from_millis(10 * 256));
    }
}
