//! JSON-over-HTTPS transport used by the service client
//!
//! [`Transport`] is the seam between request construction and the network.
//! [`HttpTransport`] is the reqwest-backed implementation; tests substitute
//! fakes that record requests.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use sitewit_domain::{ErrorDetails, Result, SiteWitError};
use tracing::{debug, warn};
use url::Url;

use super::client::HttpClient;
use crate::errors::InfraError;

/// One outgoing API call, fully composed.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute path below the base URL, e.g. `/api/account/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), headers: Vec::new(), body: None }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// Header values carry credentials.
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(key, _)| key.as_str()).collect();
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &header_names)
            .field("body", &self.body)
            .finish()
    }
}

/// Sends a composed request and returns the parsed JSON response.
///
/// Implementations must map any non-2xx response to
/// [`SiteWitError::Http`] and an empty success body to `Value::Null`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// Production transport over [`HttpClient`].
#[derive(Clone)]
pub struct HttpTransport {
    http: HttpClient,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, http: HttpClient) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SiteWitError::Config(format!("invalid base URL '{base_url}': {e}")))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined)
            .map_err(|e| SiteWitError::invalid_argument(format!("invalid path '{path}': {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = self.endpoint(&request.path)?;
        let method = request.method.clone();

        let response = self.http.execute(&url, &request).await?;
        let status = response.status();
        let text = response.text().await.map_err(|err| {
            let infra: InfraError = err.into();
            SiteWitError::from(infra)
        })?;

        if !status.is_success() {
            let details = ErrorDetails::from_body(&text);
            warn!(%method, path = %request.path, status = status.as_u16(), message = ?details.message, "API returned error status");
            return Err(SiteWitError::Http { status: status.as_u16(), details });
        }

        debug!(%method, path = %request.path, status = status.as_u16(), bytes = text.len(), "API call succeeded");

        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|err| {
            let infra: InfraError = err.into();
            SiteWitError::from(infra)
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn transport(server: &MockServer) -> HttpTransport {
        HttpTransport::new(&server.uri(), HttpClient::new().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn sends_headers_query_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/account/"))
            .and(query_param("limit", "10"))
            .and(header("PartnerAuth", "abc"))
            .and(body_json(json!({"url": "http://new"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let request = ApiRequest::new(Method::PUT, "/api/account/")
            .query("limit", 10)
            .headers([("PartnerAuth", "abc")])
            .json(json!({"url": "http://new"}));

        let value = transport(&server).await.send(request).await.unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn non_success_preserves_error_details() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "Message": "The request is invalid.",
                "ModelState": {"account.Url": ["Url is required"]}
            })))
            .mount(&server)
            .await;

        let err = transport(&server)
            .await
            .send(ApiRequest::new(Method::POST, "/api/account/"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(400));
        let details = err.details().unwrap();
        assert_eq!(details.message.as_deref(), Some("The request is invalid."));
        assert_eq!(details.field_errors("account.Url"), ["Url is required"]);
    }

    #[tokio::test]
    async fn empty_success_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let transport = transport(&server).await;
        assert_eq!(transport.send(ApiRequest::new(Method::DELETE, "/x")).await.unwrap(), Value::Null);
        assert_eq!(transport.send(ApiRequest::new(Method::PUT, "/x")).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn malformed_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = transport(&server).await.send(ApiRequest::new(Method::GET, "/x")).await.unwrap_err();
        assert!(matches!(err, SiteWitError::Decode(_)));
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = HttpTransport::new("not a url", HttpClient::new().unwrap()).err().unwrap();
        assert!(matches!(err, SiteWitError::Config(_)));
    }

    #[test]
    fn debug_hides_header_values() {
        let request =
            ApiRequest::new(Method::GET, "/api/account/").headers([("PartnerAuth", "c2VjcmV0")]);
        let rendered = format!("{request:?}");
        assert!(rendered.contains("PartnerAuth"));
        assert!(!rendered.contains("c2VjcmV0"));
    }
}
