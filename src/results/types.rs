//! Result type definitions

use crate::search::SearchMode;
use serde::{Deserialize, Serialize};
use url::Url;

/// A single web search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResultEntry {
    /// Result title
    pub title: String,
    /// Page the result points to
    pub target_url: String,
    /// Content snippet
    pub snippet: String,
    /// Domain shown above the title
    pub display_source: String,
    /// Small preview image, when the provider has one
    pub thumbnail_url: Option<String>,
    /// Provider-formatted URL shown under the snippet
    pub formatted_url: Option<String>,
}

impl WebResultEntry {
    /// Create an entry, deriving the display source from the URL host
    pub fn new(title: impl Into<String>, target_url: impl Into<String>) -> Self {
        let target_url = target_url.into();
        let display_source = host_label(&target_url).unwrap_or_default();

        Self {
            title: title.into(),
            target_url,
            snippet: String::new(),
            display_source,
            thumbnail_url: None,
            formatted_url: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Override the display source; blank values keep the derived host
    pub fn with_display_source(mut self, source: Option<String>) -> Self {
        if let Some(source) = source.filter(|s| !s.trim().is_empty()) {
            self.display_source = source;
        }
        self
    }

    pub fn with_thumbnail(mut self, url: Option<String>) -> Self {
        self.thumbnail_url = url.filter(|u| is_web_link(u));
        self
    }

    pub fn with_formatted_url(mut self, url: Option<String>) -> Self {
        self.formatted_url = url.filter(|u| !u.is_empty());
        self
    }
}

/// A single image search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResultEntry {
    /// Image title
    pub title: String,
    /// Full-resolution image
    pub target_url: String,
    /// Thumbnail shown in the grid
    pub thumbnail_url: String,
    /// Page hosting the image
    pub context_url: Option<String>,
    /// Dimensions, e.g. `1920×1080`
    pub size_label: Option<String>,
    /// Domain the image comes from
    pub source_label: String,
}

impl ImageResultEntry {
    /// Create an entry; the thumbnail defaults to the image itself
    pub fn new(title: impl Into<String>, target_url: impl Into<String>) -> Self {
        let target_url = target_url.into();

        Self {
            title: title.into(),
            thumbnail_url: target_url.clone(),
            source_label: host_label(&target_url).unwrap_or_default(),
            target_url,
            context_url: None,
            size_label: None,
        }
    }

    pub fn with_thumbnail(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| is_web_link(u)) {
            self.thumbnail_url = url;
        }
        self
    }

    /// Set the hosting page; the source label follows its host when known.
    /// Anything but an http(s) link is ignored.
    pub fn with_context(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| is_web_link(u)) {
            if let Some(host) = host_label(&url) {
                self.source_label = host;
            }
            self.context_url = Some(url);
        }
        self
    }

    pub fn with_source_label(mut self, source: Option<String>) -> Self {
        if let Some(source) = source.filter(|s| !s.trim().is_empty()) {
            self.source_label = source;
        }
        self
    }

    pub fn with_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.size_label = size_label(width, height);
        self
    }
}

/// Result entries, tagged by the mode that produced them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum Entries {
    Web(Vec<WebResultEntry>),
    Images(Vec<ImageResultEntry>),
}

/// Normalized provider answer for one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    pub entries: Entries,
    /// Provider's estimate of the total number of matches
    pub total_results: Option<u64>,
}

impl ResultSet {
    pub fn web(entries: Vec<WebResultEntry>) -> Self {
        Self {
            entries: Entries::Web(entries),
            total_results: None,
        }
    }

    pub fn images(entries: Vec<ImageResultEntry>) -> Self {
        Self {
            entries: Entries::Images(entries),
            total_results: None,
        }
    }

    /// An empty set of the given mode
    pub fn empty(mode: SearchMode) -> Self {
        match mode {
            SearchMode::Web => Self::web(vec![]),
            SearchMode::Images => Self::images(vec![]),
        }
    }

    pub fn with_total(mut self, total: Option<u64>) -> Self {
        self.total_results = total;
        self
    }

    pub fn mode(&self) -> SearchMode {
        match self.entries {
            Entries::Web(_) => SearchMode::Web,
            Entries::Images(_) => SearchMode::Images,
        }
    }

    pub fn len(&self) -> usize {
        match &self.entries {
            Entries::Web(items) => items.len(),
            Entries::Images(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether `url` is an absolute `http` or `https` link. Providers drop
/// entries whose link fails this.
pub fn is_web_link(url: &str) -> bool {
    Url::parse(url).map_or(false, |u| matches!(u.scheme(), "http" | "https"))
}

/// Host part of a URL without a leading `www.`
pub fn host_label(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.trim_start_matches("www.").to_string())
}

/// `W×H` when both dimensions are known
pub fn size_label(width: Option<u32>, height: Option<u32>) -> Option<String> {
    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some(format!("{w}×{h}")),
        _ => None,
    }
}
