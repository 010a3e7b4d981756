//! Projection of the dispatcher state into something renderable

use crate::locales::{tr, Locale};
use crate::results::{Entries, SearchOutcome};
use crate::search::{DispatchSnapshot, SearchMode};
use serde::Serialize;

/// One of the four page states
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum View {
    Idle,
    Loading { query: String, label: String },
    Error { message: String, hint: String },
    Results(ResultsView),
}

/// A result list with its heading and query badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub mode: SearchMode,
    pub heading: String,
    /// Query text exactly as searched
    pub badge: String,
    pub total_results: Option<u64>,
    pub entries: Entries,
    /// Set when there are no entries
    pub empty_label: Option<String>,
    pub visit_label: String,
}

impl View {
    pub fn is_results(&self) -> bool {
        matches!(self, Self::Results(_))
    }
}

/// Build the view for a snapshot. Reads only.
pub fn present(snapshot: &DispatchSnapshot, locale: Locale) -> View {
    let query_text = snapshot
        .query
        .as_ref()
        .map(|q| q.text().to_string())
        .unwrap_or_default();

    match &snapshot.outcome {
        SearchOutcome::Idle => View::Idle,
        SearchOutcome::Loading => View::Loading {
            query: query_text,
            label: tr(locale, "searching_for").to_string(),
        },
        SearchOutcome::Failed(reason) => View::Error {
            message: reason.message.clone(),
            hint: reason.hint.clone(),
        },
        SearchOutcome::Succeeded(set) => {
            let mode = set.mode();
            let heading = match mode {
                SearchMode::Web => tr(locale, "web_results"),
                SearchMode::Images => tr(locale, "image_results"),
            };

            View::Results(ResultsView {
                mode,
                heading: heading.to_string(),
                badge: query_text,
                total_results: set.total_results,
                entries: set.entries.clone(),
                empty_label: set
                    .is_empty()
                    .then(|| tr(locale, "no_results").to_string()),
                visit_label: tr(locale, "visit_site").to_string(),
            })
        }
    }
}
