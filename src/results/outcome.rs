//! Lifecycle state of a dispatch

use super::types::ResultSet;
use crate::locales::{tr, Locale};
use crate::search::SearchError;
use serde::Serialize;

/// Which class of failure the user is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network failure, timeout, non-2xx status or undecodable payload
    Transport,
    /// The provider answered with an error payload
    Provider,
}

/// Why a dispatch failed, in user-facing and diagnostic form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReason {
    pub kind: FailureKind,
    /// Short localized message
    pub message: String,
    /// Localized hint on what to do next
    pub hint: String,
    /// Internal description, logged but not rendered
    #[serde(skip)]
    pub diagnostic: String,
}

impl FailureReason {
    pub fn localized(error: &SearchError, locale: Locale) -> Self {
        Self {
            kind: error.kind(),
            message: tr(locale, "search_error").to_string(),
            hint: tr(locale, "retry_hint").to_string(),
            diagnostic: error.diagnostic(),
        }
    }
}

/// Current state of the most recent dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchOutcome {
    #[default]
    Idle,
    Loading,
    Failed(FailureReason),
    Succeeded(ResultSet),
}

impl SearchOutcome {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn results(&self) -> Option<&ResultSet> {
        match self {
            Self::Succeeded(set) => Some(set),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_reason() {
        let err = SearchError::Http {
            status: 500,
            detail: None,
        };
        let reason = FailureReason::localized(&err, Locale::Ru);
        assert_eq!(reason.kind, FailureKind::Transport);
        assert_eq!(reason.message, "Ошибка поиска");
        assert_eq!(reason.hint, "Попробуйте перезагрузить страницу");
        assert_eq!(reason.diagnostic, "HTTP error: 500");

        let reason = FailureReason::localized(&SearchError::Provider("quota".into()), Locale::En);
        assert_eq!(reason.kind, FailureKind::Provider);
        assert_eq!(reason.message, "Search error");
    }

    #[test]
    fn test_diagnostic_not_serialized() {
        let reason = FailureReason::localized(&SearchError::Transport("refused".into()), Locale::En);
        let json = serde_json::to_value(&reason).unwrap();
        assert!(json.get("diagnostic").is_none());
        assert_eq!(json["kind"], "transport");
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(SearchOutcome::default(), SearchOutcome::Idle);
        assert!(SearchOutcome::Loading.is_loading());
        assert!(SearchOutcome::Idle.results().is_none());
    }
}
