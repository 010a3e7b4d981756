//! Provider traits and types

use crate::results::ResultSet;
use crate::search::{SearchError, SearchQuery};
use async_trait::async_trait;
use std::collections::HashMap;

/// HTTP GET request to be made on behalf of a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: HashMap<String, String>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            params: HashMap::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// HTTP response to a provider request
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects), without query string
    pub url: String,
}

impl ProviderResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, SearchError> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The search capability the dispatcher depends on
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Short description of the provider
    fn about(&self) -> ProviderAbout {
        ProviderAbout::default()
    }

    /// Run one search and normalize the answer
    async fn search(&self, query: &SearchQuery) -> Result<ResultSet, SearchError>;
}

/// Provider metadata
#[derive(Debug, Clone, Default)]
pub struct ProviderAbout {
    /// Website URL
    pub website: Option<String>,
    /// Whether it uses the official API
    pub use_official_api: bool,
    /// Whether an API key is required
    pub require_api_key: bool,
    /// Result format (JSON, JSONP, synthetic)
    pub results: String,
}

impl ProviderAbout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn official_api(mut self, uses: bool) -> Self {
        self.use_official_api = uses;
        self
    }

    pub fn api_key_required(mut self, required: bool) -> Self {
        self.require_api_key = required;
        self
    }

    pub fn results_format(mut self, format: impl Into<String>) -> Self {
        self.results = format.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ProviderRequest::get("https://example.com/search")
            .param("q", "rust")
            .header("Accept", "application/json");
        assert_eq!(request.params.get("q").map(String::as_str), Some("rust"));
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn test_response_json() {
        let response = ProviderResponse {
            status: 200,
            text: r#"{"a": 1}"#.into(),
            url: "https://example.com".into(),
        };
        assert!(response.is_success());
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["a"], 1);

        let broken = ProviderResponse {
            status: 502,
            text: "<html>".into(),
            url: String::new(),
        };
        assert!(!broken.is_success());
        assert!(matches!(
            broken.json::<serde_json::Value>(),
            Err(SearchError::Parse(_))
        ));
    }
}
