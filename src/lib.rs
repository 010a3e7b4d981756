//! Amanda Search: a thin web search front-end over Google Custom Search
//!
//! A query goes through a per-session [`search::Dispatcher`], which talks to a
//! pluggable [`providers::SearchProvider`], normalizes the provider's payload
//! into web or image entries and keeps the loading/error state. Successful
//! searches land in a bounded [`history::SearchHistory`] unless incognito is
//! on, and [`presenter`] turns the current state into something renderable.

pub mod auth;
pub mod config;
pub mod history;
pub mod locales;
pub mod network;
pub mod preferences;
pub mod presenter;
pub mod providers;
pub mod results;
pub mod search;
pub mod session;
pub mod web;

pub use config::Settings;
pub use providers::SearchProvider;
pub use results::{ResultSet, SearchOutcome};
pub use search::{Dispatch, Dispatcher, SearchError, SearchMode, SearchQuery};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum number of entries kept in a session's search history
pub const HISTORY_CAPACITY: usize = history::DEFAULT_CAPACITY;
