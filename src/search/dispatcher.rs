//! Query dispatch with a stale-response guard

use super::error::SearchError;
use super::models::{SearchMode, SearchQuery};
use crate::locales::Locale;
use crate::providers::SearchProvider;
use crate::results::{FailureReason, ResultSet, SearchOutcome};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// What happened to one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Blank query text; nothing changed and nothing was sent
    Ignored,
    /// A newer dispatch was issued while this one was in flight, so its
    /// result was dropped
    Stale,
    /// The outcome was applied to the visible state
    Applied(SearchOutcome),
}

impl Dispatch {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Result set of an applied successful dispatch
    pub fn results(&self) -> Option<&ResultSet> {
        match self {
            Self::Applied(outcome) => outcome.results(),
            _ => None,
        }
    }
}

/// Timeout and retry policy. The default waits indefinitely and never retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    pub timeout: Option<Duration>,
    /// Extra attempts after a transport or timeout failure
    pub max_retries: u32,
}

/// Current query and outcome, as read by the presenter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSnapshot {
    pub query: Option<SearchQuery>,
    pub outcome: SearchOutcome,
}

#[derive(Debug, Default)]
struct DispatchState {
    /// Sequence number of the most recently issued dispatch
    latest: u64,
    query: Option<SearchQuery>,
    outcome: SearchOutcome,
}

/// Sends queries to a provider and owns the resulting outcome.
///
/// Every dispatch takes the next sequence number and sets the outcome to
/// `Loading` before the provider is called. When the provider answers, the
/// outcome is applied only if no newer dispatch has been issued in the
/// meantime. The state lock is never held across the provider call.
pub struct Dispatcher {
    provider: Arc<dyn SearchProvider>,
    options: DispatchOptions,
    state: Mutex<DispatchState>,
}

impl Dispatcher {
    /// Create a dispatcher with no timeout and no retries
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            options: DispatchOptions::default(),
            state: Mutex::new(DispatchState::default()),
        }
    }

    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Validate raw input and dispatch it; blank text is ignored
    pub async fn submit(&self, text: &str, mode: SearchMode, locale: Locale) -> Dispatch {
        match SearchQuery::new(text, mode, locale) {
            Ok(query) => self.dispatch(query).await,
            Err(_) => {
                debug!("Ignoring blank query");
                Dispatch::Ignored
            }
        }
    }

    /// Run one dispatch to completion
    pub async fn dispatch(&self, query: SearchQuery) -> Dispatch {
        let seq = self.begin(&query);
        let start = Instant::now();

        info!(
            "Dispatch #{} ({}) via {}",
            seq,
            query.mode(),
            self.provider.name()
        );
        debug!("Dispatch #{} query: {:?}", seq, query.text());

        let outcome = match self.fetch(&query).await {
            Ok(results) => {
                debug!(
                    "Dispatch #{} returned {} results in {:?}",
                    seq,
                    results.len(),
                    start.elapsed()
                );
                SearchOutcome::Succeeded(results)
            }
            Err(e) => {
                let reason = FailureReason::localized(&e, query.locale());
                warn!("Dispatch #{} failed: {}", seq, reason.diagnostic);
                SearchOutcome::Failed(reason)
            }
        };

        self.apply(seq, outcome)
    }

    /// Current outcome
    pub fn outcome(&self) -> SearchOutcome {
        self.lock().outcome.clone()
    }

    /// Current query and outcome
    pub fn snapshot(&self) -> DispatchSnapshot {
        let state = self.lock();
        DispatchSnapshot {
            query: state.query.clone(),
            outcome: state.outcome.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, query: &SearchQuery) -> u64 {
        let mut state = self.lock();
        state.latest += 1;
        state.query = Some(query.clone());
        state.outcome = SearchOutcome::Loading;
        state.latest
    }

    fn apply(&self, seq: u64, outcome: SearchOutcome) -> Dispatch {
        let mut state = self.lock();
        if state.latest != seq {
            debug!(
                "Discarding stale response #{} (latest is #{})",
                seq, state.latest
            );
            return Dispatch::Stale;
        }
        state.outcome = outcome.clone();
        Dispatch::Applied(outcome)
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<ResultSet, SearchError> {
        let mut attempt = 0;
        loop {
            let result = match self.options.timeout {
                Some(limit) => match timeout(limit, self.provider.search(query)).await {
                    Ok(result) => result,
                    Err(_) => Err(SearchError::Timeout(format!(
                        "no answer within {:?}",
                        limit
                    ))),
                },
                None => self.provider.search(query).await,
            };

            match result {
                Err(e) if e.is_retryable() && attempt < self.options.max_retries => {
                    attempt += 1;
                    debug!("Retrying after {} (attempt {})", e, attempt);
                }
                other => return other,
            }
        }
    }
}
