//! Google Custom Search JSON API provider

use super::traits::*;
use crate::network::{accept_language, HttpClient};
use crate::results::{is_web_link, ImageResultEntry, ResultSet, WebResultEntry};
use crate::search::{SearchError, SearchMode, SearchQuery};
use async_trait::async_trait;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Direct calls to the Custom Search REST endpoint
pub struct RemoteApi {
    client: HttpClient,
    endpoint: String,
    api_key: String,
    engine_id: String,
    num: u8,
}

impl RemoteApi {
    pub fn new(client: HttpClient, api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            num: 10,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Results per request, clamped to the API's 1..=10
    pub fn with_results_per_page(mut self, num: u8) -> Self {
        self.num = num.clamp(1, 10);
        self
    }

    fn request(&self, query: &SearchQuery) -> ProviderRequest {
        let locale = query.locale();
        let mut request = ProviderRequest::get(&self.endpoint)
            .param("key", &self.api_key)
            .param("cx", &self.engine_id)
            .param("q", query.text())
            .param("lr", locale.language_restrict())
            .param("hl", locale.code())
            .param("num", self.num.to_string())
            .header("Accept-Language", accept_language(locale));

        if query.mode() == SearchMode::Images {
            request = request.param("searchType", "image");
        }

        request
    }

    fn response(&self, mode: SearchMode, response: ProviderResponse) -> Result<ResultSet, SearchError> {
        if !response.is_success() {
            let detail = response
                .json::<ApiPayload>()
                .ok()
                .and_then(|p| p.error)
                .map(|e| e.message);
            return Err(SearchError::Http {
                status: response.status,
                detail,
            });
        }

        let payload: ApiPayload = response.json()?;

        if let Some(error) = payload.error {
            return Err(SearchError::Provider(error.message));
        }

        let total = payload
            .search_information
            .and_then(|info| info.total_results)
            .and_then(|t| t.parse().ok());

        let items = payload.items.unwrap_or_default();
        let set = match mode {
            SearchMode::Web => ResultSet::web(items.into_iter().filter_map(web_entry).collect()),
            SearchMode::Images => {
                ResultSet::images(items.into_iter().filter_map(image_entry).collect())
            }
        };

        Ok(set.with_total(total))
    }
}

fn web_entry(item: ApiItem) -> Option<WebResultEntry> {
    let link = item.link.filter(|l| is_web_link(l))?;
    let thumbnail = item
        .pagemap
        .and_then(|p| p.cse_thumbnail)
        .and_then(|thumbs| thumbs.into_iter().next())
        .map(|t| t.src);

    Some(
        WebResultEntry::new(item.title.unwrap_or_default(), link)
            .with_snippet(item.snippet.unwrap_or_default())
            .with_display_source(item.display_link)
            .with_thumbnail(thumbnail)
            .with_formatted_url(item.formatted_url),
    )
}

fn image_entry(item: ApiItem) -> Option<ImageResultEntry> {
    let link = item.link.filter(|l| is_web_link(l))?;
    let image = item.image.unwrap_or_default();

    Some(
        ImageResultEntry::new(item.title.unwrap_or_default(), link)
            .with_thumbnail(image.thumbnail_link)
            .with_context(image.context_link)
            .with_source_label(item.display_link)
            .with_size(image.width, image.height),
    )
}

#[async_trait]
impl SearchProvider for RemoteApi {
    fn name(&self) -> &str {
        "remote_api"
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://developers.google.com/custom-search/v1/overview")
            .official_api(true)
            .api_key_required(true)
            .results_format("JSON")
    }

    async fn search(&self, query: &SearchQuery) -> Result<ResultSet, SearchError> {
        let response = self.client.execute(self.request(query)).await?;
        self.response(query.mode(), response)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPayload {
    items: Option<Vec<ApiItem>>,
    search_information: Option<SearchInformation>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchInformation {
    total_results: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    display_link: Option<String>,
    formatted_url: Option<String>,
    pagemap: Option<PageMap>,
    image: Option<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct PageMap {
    cse_thumbnail: Option<Vec<Thumbnail>>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    src: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiImage {
    context_link: Option<String>,
    thumbnail_link: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locales::Locale;
    use crate::results::Entries;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> RemoteApi {
        RemoteApi::new(HttpClient::new().unwrap(), "test-key", "test-cx")
            .with_endpoint(format!("{}/customsearch/v1", server.uri()))
    }

    fn query(text: &str, mode: SearchMode) -> SearchQuery {
        SearchQuery::new(text, mode, Locale::Ru).unwrap()
    }

    #[tokio::test]
    async fn test_web_results_in_provider_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("key", "test-key"))
            .and(query_param("cx", "test-cx"))
            .and(query_param("q", "cats"))
            .and(query_param("lr", "lang_ru"))
            .and(query_param("hl", "ru"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchInformation": {"totalResults": "1230000"},
                "items": [
                    {
                        "title": "Cat - Wikipedia",
                        "link": "https://en.wikipedia.org/wiki/Cat",
                        "snippet": "The cat is a domestic species.",
                        "displayLink": "en.wikipedia.org",
                        "formattedUrl": "https://en.wikipedia.org/wiki/Cat",
                        "pagemap": {"cse_thumbnail": [{"src": "https://t.example/cat.jpg"}]}
                    },
                    {"title": "No link"},
                    {"title": "Script", "link": "javascript:alert(document.cookie)"},
                    {
                        "title": "Cats",
                        "link": "https://www.cats.example/",
                        "snippet": "All about cats"
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let set = provider(&server)
            .search(&query("cats", SearchMode::Web))
            .await
            .unwrap();

        assert_eq!(set.total_results, Some(1_230_000));
        let Entries::Web(items) = set.entries else {
            panic!("expected web entries");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Cat - Wikipedia");
        assert_eq!(items[0].display_source, "en.wikipedia.org");
        assert_eq!(
            items[0].thumbnail_url.as_deref(),
            Some("https://t.example/cat.jpg")
        );
        assert_eq!(items[1].display_source, "cats.example");
        assert_eq!(items[1].thumbnail_url, None);
    }

    #[tokio::test]
    async fn test_image_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("searchType", "image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "title": "Tabby",
                    "link": "https://img.example/tabby.jpg",
                    "displayLink": "www.pets.example",
                    "image": {
                        "contextLink": "https://www.pets.example/tabby",
                        "thumbnailLink": "https://thumbs.example/tabby.jpg",
                        "width": 800,
                        "height": 600
                    }
                }]
            })))
            .mount(&server)
            .await;

        let set = provider(&server)
            .search(&query("tabby", SearchMode::Images))
            .await
            .unwrap();

        let Entries::Images(items) = set.entries else {
            panic!("expected image entries");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].target_url, "https://img.example/tabby.jpg");
        assert_eq!(items[0].thumbnail_url, "https://thumbs.example/tabby.jpg");
        assert_eq!(
            items[0].context_url.as_deref(),
            Some("https://www.pets.example/tabby")
        );
        assert_eq!(items[0].source_label, "www.pets.example");
        assert_eq!(items[0].size_label.as_deref(), Some("800×600"));
    }

    #[tokio::test]
    async fn test_missing_items_is_empty_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchInformation": {"totalResults": "0"}
            })))
            .mount(&server)
            .await;

        let set = provider(&server)
            .search(&query("zzzz", SearchMode::Images))
            .await
            .unwrap();

        assert!(set.is_empty());
        assert_eq!(set.mode(), SearchMode::Images);
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .search(&query("cats", SearchMode::Web))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SearchError::Http {
                status: 500,
                detail: None
            }
        );
    }

    #[tokio::test]
    async fn test_error_payloads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "quota"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"code": 429, "message": "Quota exceeded"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "bad"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": {"message": "Invalid Value"}
            })))
            .mount(&server)
            .await;

        let provider = provider(&server);

        let err = provider
            .search(&query("quota", SearchMode::Web))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::Http {
                status: 429,
                detail: Some("Quota exceeded".into())
            }
        );

        let err = provider
            .search(&query("bad", SearchMode::Web))
            .await
            .unwrap_err();
        assert_eq!(err, SearchError::Provider("Invalid Value".into()));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .search(&query("cats", SearchMode::Web))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn test_results_per_page_clamped() {
        let api = RemoteApi::new(HttpClient::new().unwrap(), "k", "c").with_results_per_page(50);
        let request = api.request(&query("x", SearchMode::Web));
        assert_eq!(request.params.get("num").map(String::as_str), Some("10"));
        assert!(!request.params.contains_key("searchType"));
    }
}
