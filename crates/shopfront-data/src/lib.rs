//! HTTP client utilities for the storefront backend API.
//!
//! Provides a small builder API over `reqwest` with automatic JSON handling,
//! a client-wide base URL and per-request timeouts.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_data::FetchClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Page {
//!     total: u64,
//! }
//!
//! let client = FetchClient::new().with_base_url("http://backend:8000");
//!
//! let page: Page = client
//!     .get("/catalog/search")
//!     .query("type", "machines")
//!     .query("limit", 20)
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;

use std::collections::HashMap;
use std::time::Duration;

/// Default timeout applied to every request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for making outbound requests.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    inner: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    timeout: Duration,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: None,
            default_headers: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a client with a base URL that will be prepended to relative requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the client-wide request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured base URL, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url).accept("application/json");
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder<'a> {
    client: &'a FetchClient,
    builder: RequestBuilder,
}

impl<'a> ClientRequestBuilder<'a> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a query-string parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Append a query-string parameter only when present.
    pub fn query_opt(mut self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        self.builder = self.builder.query_opt(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Override the timeout for this request only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.builder = self.builder.timeout(timeout);
        self
    }

    /// Inspect the request that would be sent.
    pub fn as_request(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and buffer the response.
    ///
    /// Non-2xx statuses are returned as a normal [`Response`]; use
    /// [`Response::error_for_status`] to turn them into errors.
    pub async fn send(self) -> Result<Response, FetchError> {
        let req = self.builder;
        let timeout = req.timeout.unwrap_or(self.client.timeout);

        let mut outbound = self
            .client
            .inner
            .request(req.method.to_reqwest(), &req.url)
            .timeout(timeout);
        if !req.query.is_empty() {
            outbound = outbound.query(&req.query);
        }
        for (key, value) in &req.headers {
            outbound = outbound.header(key.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            outbound = outbound.body(body);
        }

        tracing::debug!(method = req.method.as_str(), url = %req.url, "sending request");
        let resp = outbound.send().await?;
        let resp = Response::from_reqwest(resp).await?;
        tracing::debug!(status = resp.status, url = %req.url, "received response");
        Ok(resp)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Response};
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_base_url_joining() {
        let client = FetchClient::new().with_base_url("http://backend:8000/");
        let req = client.get("/catalog/search");
        assert_eq!(req.as_request().url(), "http://backend:8000/catalog/search");

        let req = client.get("catalog/filters");
        assert_eq!(req.as_request().url(), "http://backend:8000/catalog/filters");
    }

    #[test]
    fn test_absolute_url_bypasses_base() {
        let client = FetchClient::new().with_base_url("http://backend:8000");
        let req = client.get("https://cdn.example.com/x");
        assert_eq!(req.as_request().url(), "https://cdn.example.com/x");
    }

    #[tokio::test]
    async fn test_send_with_query_and_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/catalog/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "токарный станок".into()),
                Matcher::UrlEncoded("limit".into(), "20".into()),
            ]))
            .match_header("x-client", "shopfront")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total": 3}"#)
            .create_async()
            .await;

        let client = FetchClient::new()
            .with_base_url(server.url())
            .with_default_header("X-Client", "shopfront");
        let resp = client
            .get("/catalog/search")
            .query("q", "токарный станок")
            .query("limit", 20)
            .send()
            .await
            .unwrap();

        assert!(resp.is_success());
        assert_eq!(resp.json::<serde_json::Value>().unwrap()["total"], 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ingest/leads")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({"source": "cart_order"})))
            .with_status(201)
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        let client = FetchClient::new().with_base_url(server.url());
        let resp = client
            .post("/ingest/leads")
            .json(&serde_json::json!({"source": "cart_order"}))
            .unwrap()
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status, 201);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_is_not_an_error_until_checked() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/catalog/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let client = FetchClient::new().with_base_url(server.url());
        let resp = client.get("/catalog/missing").send().await.unwrap();
        assert!(resp.is_not_found());
        assert_eq!(resp.error_for_status().unwrap_err().status(), Some(404));
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_request_error() {
        let client = FetchClient::new()
            .with_base_url("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(2));
        let err = client.get("/x").send().await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::RequestError(_) | FetchError::Timeout
        ));
    }
}
