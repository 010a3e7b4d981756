//! Error taxonomy for search dispatch.
//!
//! Messages never contain the provider API key: transport errors are built
//! from `reqwest` errors with their URL stripped.

use crate::results::FailureKind;

/// Errors raised while building, sending or decoding a search request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Query text was blank after trimming. Never shown to the user.
    #[error("query is empty")]
    EmptyQuery,

    /// The request could not be sent or the connection broke.
    #[error("network error: {0}")]
    Transport(String),

    /// The provider did not answer within the configured timeout.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// The provider answered with a non-2xx status.
    #[error("HTTP error: {status}")]
    Http { status: u16, detail: Option<String> },

    /// The provider answered with a well-formed error payload.
    #[error("provider error: {0}")]
    Provider(String),

    /// The payload could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid provider or application configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Which user-facing failure class this error belongs to
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Provider(_) => FailureKind::Provider,
            _ => FailureKind::Transport,
        }
    }

    /// Whether re-issuing the same request might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }

    /// Longer description for logs
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Http {
                status,
                detail: Some(detail),
            } => format!("HTTP error: {status} ({detail})"),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        let timed_out = err.is_timeout();
        let message = err.without_url().to_string();
        if timed_out {
            Self::Timeout(message)
        } else {
            Self::Transport(message)
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http() {
        let err = SearchError::Http {
            status: 500,
            detail: None,
        };
        assert_eq!(err.to_string(), "HTTP error: 500");
    }

    #[test]
    fn diagnostic_includes_detail() {
        let err = SearchError::Http {
            status: 403,
            detail: Some("Daily Limit Exceeded".into()),
        };
        assert_eq!(err.diagnostic(), "HTTP error: 403 (Daily Limit Exceeded)");
    }

    #[test]
    fn provider_errors_are_provider_kind() {
        assert_eq!(
            SearchError::Provider("bad cx".into()).kind(),
            FailureKind::Provider
        );
        assert_eq!(
            SearchError::Transport("refused".into()).kind(),
            FailureKind::Transport
        );
        assert_eq!(
            SearchError::Http {
                status: 500,
                detail: None
            }
            .kind(),
            FailureKind::Transport
        );
    }

    #[test]
    fn only_network_errors_retry() {
        assert!(SearchError::Transport("reset".into()).is_retryable());
        assert!(SearchError::Timeout("5s".into()).is_retryable());
        assert!(!SearchError::Provider("quota".into()).is_retryable());
        assert!(!SearchError::Http {
            status: 500,
            detail: None
        }
        .is_retryable());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
