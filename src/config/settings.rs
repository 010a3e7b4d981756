//! Settings structures for Amanda Search configuration

use crate::locales::Locale;
use crate::preferences::Theme;
use crate::search::SearchError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    pub outgoing: OutgoingSettings,
    pub dispatch: DispatchSettings,
    pub history: HistorySettings,
    pub ui: UiSettings,
    pub auth: AuthSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (AMANDA_* prefix plus the Google credentials)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("AMANDA_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = var("AMANDA_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("AMANDA_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("AMANDA_PROVIDER") {
            match val.parse() {
                Ok(kind) => self.provider.kind = kind,
                Err(e) => tracing::warn!("Ignoring AMANDA_PROVIDER: {}", e),
            }
        }
        if let Some(val) = var("GOOGLE_API_KEY") {
            self.provider.api_key = Some(val);
        }
        if let Some(val) = var("GOOGLE_CSE_ID") {
            self.provider.engine_id = Some(val);
        }
    }

    /// Check the settings for values the application cannot run with
    pub fn validate(&self) -> std::result::Result<(), SearchError> {
        let needs_engine_id = matches!(
            self.provider.kind,
            ProviderKind::RemoteApi | ProviderKind::EmbeddedWidget
        );
        if needs_engine_id && is_blank(&self.provider.engine_id) {
            return Err(SearchError::Config(format!(
                "provider.engine_id is required for {} (set GOOGLE_CSE_ID)",
                self.provider.kind
            )));
        }
        if self.provider.kind == ProviderKind::RemoteApi && is_blank(&self.provider.api_key) {
            return Err(SearchError::Config(
                "provider.api_key is required for remote_api (set GOOGLE_API_KEY)".into(),
            ));
        }
        if !(1..=10).contains(&self.provider.results_per_page) {
            return Err(SearchError::Config(
                "provider.results_per_page must be between 1 and 10".into(),
            ));
        }
        if self.history.capacity == 0 {
            return Err(SearchError::Config(
                "history.capacity must be greater than 0".into(),
            ));
        }
        if matches!(self.dispatch.timeout, Some(t) if t <= 0.0) {
            return Err(SearchError::Config(
                "dispatch.timeout must be greater than 0".into(),
            ));
        }
        if self.server.session_ttl == 0 {
            return Err(SearchError::Config(
                "server.session_ttl must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name displayed in UI
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Amanda Search".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Idle time in seconds after which a session is dropped
    pub session_ttl: u64,
    /// Upper bound on live sessions
    pub max_sessions: u64,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8888,
            bind_address: "127.0.0.1".to_string(),
            session_ttl: 1800,
            max_sessions: 10_000,
            secure_cookies: false,
        }
    }
}

/// Which search provider implementation to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Google Custom Search JSON API
    #[default]
    RemoteApi,
    /// Programmable Search Element endpoint used by the embeddable widget
    EmbeddedWidget,
    /// Synthetic results, no network
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RemoteApi => "remote_api",
            Self::EmbeddedWidget => "embedded_widget",
            Self::Mock => "mock",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "remote_api" => Ok(Self::RemoteApi),
            "embedded_widget" => Ok(Self::EmbeddedWidget),
            "mock" => Ok(Self::Mock),
            other => Err(format!("unknown provider kind: {other}")),
        }
    }
}

/// Search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// Google API key (remote_api only)
    pub api_key: Option<String>,
    /// Programmable Search Engine id (`cx`)
    pub engine_id: Option<String>,
    /// Override the provider endpoint
    pub endpoint: Option<String>,
    /// Results requested per search (1..=10)
    pub results_per_page: u8,
    pub mock: MockSettings,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            api_key: None,
            engine_id: None,
            endpoint: None,
            results_per_page: 10,
            mock: MockSettings::default(),
        }
    }
}

/// Mock provider behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    /// Simulated response latency in milliseconds
    pub latency_ms: u64,
    /// Number of results to fabricate
    pub result_count: usize,
    /// Fail every search with this provider error message
    pub fail_with: Option<String>,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            latency_ms: 0,
            result_count: 8,
            fail_with: None,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Client-level request timeout in seconds (none = wait indefinitely)
    pub request_timeout: Option<f64>,
    /// Connection timeout in seconds
    pub connect_timeout: f64,
    /// User agent string (none = crate default)
    pub useragent: Option<String>,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: None,
            connect_timeout: 10.0,
            useragent: None,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Dispatcher behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Give up on a search after this many seconds (none = never)
    pub timeout: Option<f64>,
    /// Re-issue a search this many times after network failures
    pub max_retries: u32,
}

impl DispatchSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs_f64)
    }
}

/// Search history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Entries kept per session
    pub capacity: usize,
    /// Collapse a repeat of the newest entry instead of adding another
    pub dedupe_consecutive: bool,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: crate::history::DEFAULT_CAPACITY,
            dedupe_consecutive: false,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Language for sessions without an Accept-Language match
    pub default_locale: Locale,
    /// Default theme
    pub default_theme: Theme,
    /// Links shown on the home page
    pub quick_links: Vec<QuickLink>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            default_locale: Locale::Ru,
            default_theme: Theme::Light,
            quick_links: default_quick_links(),
        }
    }
}

/// A popular site shown on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLink {
    pub name: String,
    pub url: String,
}

impl QuickLink {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

fn default_quick_links() -> Vec<QuickLink> {
    vec![
        QuickLink::new("YouTube", "https://youtube.com"),
        QuickLink::new("Wikipedia", "https://wikipedia.org"),
        QuickLink::new("TikTok", "https://tiktok.com"),
        QuickLink::new("GitHub", "https://github.com"),
        QuickLink::new("Twitter", "https://twitter.com"),
        QuickLink::new("Instagram", "https://instagram.com"),
    ]
}

/// Sign-in settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Only signed-in users may search
    pub required: bool,
    /// Minimum accepted password length
    pub min_password_len: usize,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            required: false,
            min_password_len: 6,
        }
    }
}
