//! HTTP response handling.

use crate::FetchError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Longest error body echoed back inside a [`FetchError::HttpError`].
const MAX_ERROR_BODY: usize = 256;

/// A fully-buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers, keyed by lowercase name.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response. Header names are normalized to lowercase.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    pub(crate) async fn from_reqwest(resp: reqwest::Response) -> Result<Self, FetchError> {
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = resp.bytes().await?.to_vec();
        Ok(Self::new(status, headers, body))
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        let mut message = String::from_utf8_lossy(&self.body).trim().to_string();
        if message.is_empty() {
            message = "empty response body".to_string();
        } else if message.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|i| message.is_char_boundary(*i))
                .unwrap_or(0);
            message.truncate(cut);
            message.push_str("...");
        }
        Err(FetchError::HttpError {
            status: self.status,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, headers: &[(&str, &str)], body: &[u8]) -> Response {
        let headers = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Response::new(status, headers, body.to_vec())
    }

    #[test]
    fn test_status_classes() {
        assert!(make_response(200, &[], b"").is_success());
        assert!(make_response(204, &[], b"").is_success());
        assert!(!make_response(301, &[], b"").is_success());
        assert!(make_response(404, &[], b"").is_not_found());
    }

    #[test]
    fn test_json_body() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Page {
            total: u64,
        }

        let resp = make_response(200, &[], br#"{"total": 57}"#);
        assert_eq!(resp.json::<Page>().unwrap(), Page { total: 57 });
        assert!(make_response(200, &[], b"<html>").json::<Page>().is_err());
    }

    #[test]
    fn test_text_invalid_utf8() {
        assert!(make_response(200, &[], &[0xff, 0xfe]).text().is_err());
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let resp = make_response(200, &[("Content-Type", "application/json")], b"");
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    #[test]
    fn test_error_for_status_keeps_body() {
        let err = make_response(502, &[], b"bad gateway")
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_error_for_status_truncates_long_body() {
        let body = "x".repeat(1000);
        match make_response(500, &[], body.as_bytes()).error_for_status() {
            Err(FetchError::HttpError { message, .. }) => {
                assert_eq!(message.len(), MAX_ERROR_BODY + 3);
                assert!(message.ends_with("..."));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_error_for_status_empty_body() {
        match make_response(503, &[], b"").error_for_status() {
            Err(FetchError::HttpError { message, .. }) => {
                assert_eq!(message, "empty response body")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
