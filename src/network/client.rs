//! HTTP client for making requests to search providers

use super::headers::{accept_json, default_user_agent};
use crate::config::OutgoingSettings;
use crate::providers::{ProviderRequest, ProviderResponse};
use crate::search::SearchError;
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client wrapper shared by the providers
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs_f64(settings.connect_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // No overall limit unless configured
        if let Some(secs) = settings.request_timeout {
            builder = builder.timeout(Duration::from_secs_f64(secs));
        }

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent: settings
                .useragent
                .clone()
                .unwrap_or_else(default_user_agent),
        })
    }

    /// Execute a provider request
    pub async fn execute(&self, request: ProviderRequest) -> Result<ProviderResponse, SearchError> {
        let mut req_builder = self
            .client
            .get(&request.url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_json());

        // Provider headers override the defaults
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse response into ProviderResponse
    async fn parse_response(response: Response) -> Result<ProviderResponse, SearchError> {
        let status = response.status().as_u16();

        // The query string carries the API key
        let mut url = response.url().clone();
        url.set_query(None);

        let text = response.text().await?;

        Ok(ProviderResponse {
            status,
            text,
            url: url.to_string(),
        })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
        assert!(client.unwrap().user_agent().starts_with("amanda-search/"));
    }

    #[tokio::test]
    async fn test_configured_user_agent() {
        let settings = OutgoingSettings {
            useragent: Some("custom/1.0".into()),
            ..OutgoingSettings::default()
        };
        let client = HttpClient::with_settings(&settings).unwrap();
        assert_eq!(client.user_agent(), "custom/1.0");
    }

    #[tokio::test]
    async fn test_execute_sends_params_and_strips_query_from_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1"))
            .and(query_param("key", "secret"))
            .and(header("Accept-Language", "ru"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = ProviderRequest::get(format!("{}/v1", server.uri()))
            .param("key", "secret")
            .header("Accept-Language", "ru");
        let response = client.execute(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text, "{}");
        assert!(!response.url.contains("secret"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Nothing listens on a port that was just released
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let client = HttpClient::new().unwrap();
        let result = client
            .execute(ProviderRequest::get(uri).param("key", "secret"))
            .await;

        match result {
            Err(SearchError::Transport(message)) => assert!(!message.contains("secret")),
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
