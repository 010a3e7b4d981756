//! Synthetic provider for local development and tests

use super::traits::*;
use crate::config::MockSettings;
use crate::results::{ImageResultEntry, ResultSet, WebResultEntry};
use crate::search::{SearchError, SearchMode, SearchQuery};
use async_trait::async_trait;
use std::time::Duration;

/// Returns deterministic results derived from the query text
#[derive(Debug, Clone)]
pub struct MockProvider {
    latency: Duration,
    result_count: usize,
    fail_with: Option<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::from_settings(&MockSettings::default())
    }

    pub fn from_settings(settings: &MockSettings) -> Self {
        Self {
            latency: Duration::from_millis(settings.latency_ms),
            result_count: settings.result_count,
            fail_with: settings.fail_with.clone(),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_result_count(mut self, count: usize) -> Self {
        self.result_count = count;
        self
    }

    /// Fail every search with a provider error
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    fn web_results(&self, text: &str) -> ResultSet {
        let encoded = urlencoding::encode(text);
        let entries = (1..=self.result_count)
            .map(|n| {
                WebResultEntry::new(
                    format!("{text} result {n}"),
                    format!("https://example.com/{encoded}/{n}"),
                )
                .with_snippet(format!("Result {n} for {text}"))
            })
            .collect();
        ResultSet::web(entries).with_total(Some(self.result_count as u64))
    }

    fn image_results(&self, text: &str) -> ResultSet {
        let encoded = urlencoding::encode(text);
        let entries = (1..=self.result_count)
            .map(|n| {
                ImageResultEntry::new(
                    format!("{text} image {n}"),
                    format!("https://images.example.com/{encoded}/{n}.jpg"),
                )
                .with_thumbnail(Some(format!(
                    "https://images.example.com/{encoded}/{n}_thumb.jpg"
                )))
                .with_context(Some(format!("https://example.com/{encoded}/{n}")))
                .with_size(Some(640), Some(480))
            })
            .collect();
        ResultSet::images(entries).with_total(Some(self.result_count as u64))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new().results_format("synthetic")
    }

    async fn search(&self, query: &SearchQuery) -> Result<ResultSet, SearchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if let Some(ref message) = self.fail_with {
            return Err(SearchError::Provider(message.clone()));
        }

        Ok(match query.mode() {
            SearchMode::Web => self.web_results(query.text()),
            SearchMode::Images => self.image_results(query.text()),
        })
    }
}
