//! Programmable Search Element provider
//!
//! Talks to the endpoint behind Google's embeddable search widget. Its answer
//! is JSONP-wrapped and uses different field names than the REST API.

use super::traits::*;
use crate::network::{accept_language, HttpClient};
use crate::results::{is_web_link, ImageResultEntry, ResultSet, WebResultEntry};
use crate::search::{SearchError, SearchMode, SearchQuery};
use async_trait::async_trait;
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "https://cse.google.com/cse/element/v1";

const CALLBACK: &str = "google.search.cse.api";

/// Searches through the widget endpoint; needs only the engine id
pub struct EmbeddedWidget {
    client: HttpClient,
    endpoint: String,
    engine_id: String,
    num: u8,
}

impl EmbeddedWidget {
    pub fn new(client: HttpClient, engine_id: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            engine_id: engine_id.into(),
            num: 10,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_results_per_page(mut self, num: u8) -> Self {
        self.num = num.clamp(1, 10);
        self
    }

    fn request(&self, query: &SearchQuery) -> ProviderRequest {
        let locale = query.locale();
        let mut request = ProviderRequest::get(&self.endpoint)
            .param("cx", &self.engine_id)
            .param("q", query.text())
            .param("hl", locale.code())
            .param("lr", locale.language_restrict())
            .param("num", self.num.to_string())
            .param("rsz", "filtered_cse")
            .param("source", "gcsc")
            .param("callback", CALLBACK)
            .header("Accept-Language", accept_language(locale));

        if query.mode() == SearchMode::Images {
            request = request.param("searchtype", "image");
        }

        request
    }

    fn response(&self, mode: SearchMode, response: ProviderResponse) -> Result<ResultSet, SearchError> {
        if !response.is_success() {
            return Err(SearchError::Http {
                status: response.status,
                detail: None,
            });
        }

        let json: Value = serde_json::from_str(unwrap_jsonp(&response.text))?;

        if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown widget error");
            return Err(SearchError::Provider(message.to_string()));
        }

        let total = json
            .get("cursor")
            .and_then(|c| c.get("estimatedResultCount"))
            .and_then(as_u64);

        let items = json
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let set = match mode {
            SearchMode::Web => ResultSet::web(items.iter().filter_map(web_entry).collect()),
            SearchMode::Images => ResultSet::images(items.iter().filter_map(image_entry).collect()),
        };

        Ok(set.with_total(total))
    }
}

/// Strip the `callback( ... );` wrapper; plain JSON passes through
fn unwrap_jsonp(text: &str) -> &str {
    let text = text.trim();
    if text.starts_with('{') {
        return text;
    }
    match (text.find('('), text.rfind(')')) {
        (Some(open), Some(close)) if open < close => &text[open + 1..close],
        _ => text,
    }
}

fn str_field(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Numbers arrive as JSON numbers or as strings
fn as_u64(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn dimension(item: &Value, key: &str) -> Option<u32> {
    item.get(key)
        .and_then(as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

fn title(item: &Value) -> String {
    str_field(item, "titleNoFormatting")
        .or_else(|| str_field(item, "title"))
        .unwrap_or_default()
}

fn web_entry(item: &Value) -> Option<WebResultEntry> {
    let url = str_field(item, "unescapedUrl")
        .or_else(|| str_field(item, "url"))
        .filter(|u| is_web_link(u))?;
    let thumbnail = item
        .get("richSnippet")
        .and_then(|r| r.get("cseThumbnail"))
        .and_then(|t| t.get("src"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(
        WebResultEntry::new(title(item), url)
            .with_snippet(str_field(item, "contentNoFormatting").unwrap_or_default())
            .with_display_source(str_field(item, "visibleUrl"))
            .with_thumbnail(thumbnail)
            .with_formatted_url(str_field(item, "formattedUrl")),
    )
}

fn image_entry(item: &Value) -> Option<ImageResultEntry> {
    let url = str_field(item, "unescapedUrl")
        .or_else(|| str_field(item, "url"))
        .filter(|u| is_web_link(u))?;

    Some(
        ImageResultEntry::new(title(item), url)
            .with_thumbnail(str_field(item, "tbUrl"))
            .with_context(str_field(item, "originalContextUrl"))
            .with_source_label(str_field(item, "visibleUrl"))
            .with_size(dimension(item, "width"), dimension(item, "height")),
    )
}

#[async_trait]
impl SearchProvider for EmbeddedWidget {
    fn name(&self) -> &str {
        "embedded_widget"
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://programmablesearchengine.google.com")
            .official_api(false)
            .results_format("JSONP")
    }

    async fn search(&self, query: &SearchQuery) -> Result<ResultSet, SearchError> {
        let response = self.client.execute(self.request(query)).await?;
        self.response(query.mode(), response)
    }
}
