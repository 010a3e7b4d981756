//! Per-browser session: one dispatcher, one history, one preference set

mod store;

pub use store::{SessionFactory, SessionStore};

use crate::history::{SearchHistory, SearchHistoryEntry};
use crate::locales::Locale;
use crate::preferences::{PreferenceStore, Preferences, Theme};
use crate::presenter::{present, View};
use crate::search::{Dispatch, Dispatcher, SearchMode, SearchQuery};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;
use uuid::Uuid;

/// Single owner of the mutable state for one browser
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    dispatcher: Dispatcher,
    history: Mutex<SearchHistory>,
    preferences: Mutex<Preferences>,
    store: Box<dyn PreferenceStore>,
}

impl Session {
    /// Create a session, loading its preferences from `store`
    pub fn new(
        id: Uuid,
        dispatcher: Dispatcher,
        mut history: SearchHistory,
        store: Box<dyn PreferenceStore>,
        defaults: Preferences,
    ) -> Self {
        let preferences = Preferences::load(store.as_ref(), defaults);
        history.set_incognito(preferences.incognito);

        Self {
            id,
            created_at: Utc::now(),
            dispatcher,
            history: Mutex::new(history),
            preferences: Mutex::new(preferences),
            store,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Search in the session language. An applied success is recorded in
    /// the history; everything else leaves it alone.
    pub async fn submit(&self, text: &str, mode: SearchMode) -> Dispatch {
        let locale = self.language();
        let query = match SearchQuery::new(text, mode, locale) {
            Ok(query) => query,
            Err(_) => return Dispatch::Ignored,
        };
        let entry = SearchHistoryEntry::new(query.text(), mode);

        let dispatch = self.dispatcher.dispatch(query).await;

        if dispatch.results().is_some() {
            let recorded = lock(&self.history).record(entry);
            debug!("Session {} history recorded: {}", self.id, recorded);
        }

        dispatch
    }

    /// Presenter view of the current dispatcher state
    pub fn view(&self) -> View {
        present(&self.dispatcher.snapshot(), self.language())
    }

    /// Text of the current query, if any
    pub fn current_query(&self) -> Option<SearchQuery> {
        self.dispatcher.snapshot().query
    }

    pub fn history(&self) -> Vec<SearchHistoryEntry> {
        lock(&self.history).list()
    }

    pub fn clear_history(&self) {
        lock(&self.history).clear();
    }

    pub fn preferences(&self) -> Preferences {
        *lock(&self.preferences)
    }

    pub fn language(&self) -> Locale {
        lock(&self.preferences).language
    }

    pub fn set_language(&self, language: Locale) {
        self.update(|prefs| prefs.language = language);
    }

    pub fn toggle_theme(&self) -> Theme {
        self.update(|prefs| prefs.theme = prefs.theme.toggled()).theme
    }

    pub fn set_incognito(&self, incognito: bool) {
        self.update(|prefs| prefs.incognito = incognito);
        lock(&self.history).set_incognito(incognito);
    }

    pub fn toggle_incognito(&self) -> bool {
        let incognito = !self.preferences().incognito;
        self.set_incognito(incognito);
        incognito
    }

    /// Forget the preferences saved for this session
    pub fn end(&self) {
        Preferences::clear(self.store.as_ref());
        debug!("Session {} preferences cleared", self.id);
    }

    fn update(&self, change: impl FnOnce(&mut Preferences)) -> Preferences {
        let mut prefs = lock(&self.preferences);
        change(&mut prefs);
        prefs.save(self.store.as_ref());
        *prefs
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
