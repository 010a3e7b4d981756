//! Provider loader for initializing the search provider from configuration

use super::mock::MockProvider;
use super::remote_api::RemoteApi;
use super::traits::SearchProvider;
use super::widget::EmbeddedWidget;
use crate::config::{ProviderKind, Settings};
use crate::network::HttpClient;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::info;

/// Loader for the configured search provider
pub struct ProviderLoader;

impl ProviderLoader {
    /// Build the provider named by `provider.kind`
    pub fn load(settings: &Settings, client: HttpClient) -> Result<Arc<dyn SearchProvider>> {
        let config = &settings.provider;

        let provider: Arc<dyn SearchProvider> = match config.kind {
            ProviderKind::RemoteApi => {
                let api_key = required(&config.api_key, "provider.api_key")?;
                let engine_id = required(&config.engine_id, "provider.engine_id")?;
                let mut api = RemoteApi::new(client, api_key, engine_id)
                    .with_results_per_page(config.results_per_page);
                if let Some(ref endpoint) = config.endpoint {
                    api = api.with_endpoint(endpoint);
                }
                Arc::new(api)
            }
            ProviderKind::EmbeddedWidget => {
                let engine_id = required(&config.engine_id, "provider.engine_id")?;
                let mut widget = EmbeddedWidget::new(client, engine_id)
                    .with_results_per_page(config.results_per_page);
                if let Some(ref endpoint) = config.endpoint {
                    widget = widget.with_endpoint(endpoint);
                }
                Arc::new(widget)
            }
            ProviderKind::Mock => Arc::new(MockProvider::from_settings(&config.mock)),
        };

        info!("Loaded search provider: {}", provider.name());
        Ok(provider)
    }

    /// Get list of available provider kinds
    pub fn available_providers() -> Vec<&'static str> {
        [
            ProviderKind::RemoteApi,
            ProviderKind::EmbeddedWidget,
            ProviderKind::Mock,
        ]
        .iter()
        .map(ProviderKind::as_str)
        .collect()
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("{} is not set", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_each_kind() {
        let mut settings = Settings::default();

        settings.provider.kind = ProviderKind::Mock;
        let provider = ProviderLoader::load(&settings, HttpClient::new().unwrap()).unwrap();
        assert_eq!(provider.name(), "mock");

        settings.provider.kind = ProviderKind::EmbeddedWidget;
        settings.provider.engine_id = Some("cx".into());
        let provider = ProviderLoader::load(&settings, HttpClient::new().unwrap()).unwrap();
        assert_eq!(provider.name(), "embedded_widget");

        settings.provider.kind = ProviderKind::RemoteApi;
        settings.provider.api_key = Some("key".into());
        let provider = ProviderLoader::load(&settings, HttpClient::new().unwrap()).unwrap();
        assert_eq!(provider.name(), "remote_api");
        assert!(provider.about().require_api_key);
    }

    #[test]
    fn test_missing_key_fails() {
        let mut settings = Settings::default();
        settings.provider.engine_id = Some("cx".into());
        let err = ProviderLoader::load(&settings, HttpClient::new().unwrap())
            .err()
            .unwrap();
        assert!(err.to_string().contains("provider.api_key"));
    }

    #[test]
    fn test_available_providers() {
        assert_eq!(
            ProviderLoader::available_providers(),
            vec!["remote_api", "embedded_widget", "mock"]
        );
    }
}
