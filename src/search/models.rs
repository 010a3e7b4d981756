//! Search query and related data models

use super::error::SearchError;
use crate::locales::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of results a search asks for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Web,
    Images,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Images => "images",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(Self::Web),
            "images" | "image" => Ok(Self::Images),
            other => Err(format!("unknown search mode: {other}")),
        }
    }
}

/// A validated search request. The text is trimmed and never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    text: String,
    mode: SearchMode,
    locale: Locale,
}

impl SearchQuery {
    /// Build a query, rejecting text that is blank after trimming
    pub fn new(text: &str, mode: SearchMode, locale: Locale) -> Result<Self, SearchError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        Ok(Self {
            text: text.to_string(),
            mode,
            locale,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed() {
        let query = SearchQuery::new("  hello world \n", SearchMode::Web, Locale::En).unwrap();
        assert_eq!(query.text(), "hello world");
        assert_eq!(query.mode(), SearchMode::Web);
        assert_eq!(query.locale(), Locale::En);
    }

    #[test]
    fn test_blank_query_rejected() {
        for text in ["", "   ", "\t\n"] {
            assert_eq!(
                SearchQuery::new(text, SearchMode::Images, Locale::Ru),
                Err(SearchError::EmptyQuery)
            );
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("images".parse::<SearchMode>(), Ok(SearchMode::Images));
        assert_eq!("Web".parse::<SearchMode>(), Ok(SearchMode::Web));
        assert!("video".parse::<SearchMode>().is_err());
        assert_eq!(SearchMode::default(), SearchMode::Web);
    }
}
