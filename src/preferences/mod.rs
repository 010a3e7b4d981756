//! User preferences and the key-value store they live in
//!
//! [`Preferences`] is an explicit value handed to whoever needs it. Loading
//! and saving go through an injected [`PreferenceStore`].

use crate::locales::Locale;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

pub const LANGUAGE_KEY: &str = "amanda-language";
pub const DARK_MODE_KEY: &str = "amanda-dark-mode";
pub const INCOGNITO_KEY: &str = "amanda-incognito";

/// String key-value storage
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Prefixes every key so several sessions can share one store
pub struct ScopedStore {
    inner: Arc<dyn PreferenceStore>,
    scope: String,
}

impl ScopedStore {
    pub fn new(inner: Arc<dyn PreferenceStore>, scope: impl Into<String>) -> Self {
        Self {
            inner,
            scope: scope.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.scope, key)
    }
}

impl PreferenceStore for ScopedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(&self.key(key))
    }

    fn set(&self, key: &str, value: &str) {
        self.inner.set(&self.key(key), value)
    }

    fn remove(&self, key: &str) {
        self.inner.remove(&self.key(key))
    }
}

/// Light or dark page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Self::Dark
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Language, theme and privacy flag for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub language: Locale,
    pub theme: Theme,
    pub incognito: bool,
}

impl Preferences {
    /// Read from the store; missing or malformed values keep the defaults
    pub fn load(store: &dyn PreferenceStore, defaults: Preferences) -> Self {
        let language = store
            .get(LANGUAGE_KEY)
            .and_then(|v| Locale::from_code(&v))
            .unwrap_or(defaults.language);

        let theme = match store.get(DARK_MODE_KEY).and_then(|v| v.parse::<bool>().ok()) {
            Some(true) => Theme::Dark,
            Some(false) => Theme::Light,
            None => defaults.theme,
        };

        let incognito = store
            .get(INCOGNITO_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.incognito);

        Self {
            language,
            theme,
            incognito,
        }
    }

    pub fn save(&self, store: &dyn PreferenceStore) {
        store.set(LANGUAGE_KEY, self.language.code());
        store.set(DARK_MODE_KEY, &self.theme.is_dark().to_string());
        store.set(INCOGNITO_KEY, &self.incognito.to_string());
        debug!("Saved preferences: {:?}", self);
    }

    /// Remove every saved preference key from the store
    pub fn clear(store: &dyn PreferenceStore) {
        for key in [LANGUAGE_KEY, DARK_MODE_KEY, INCOGNITO_KEY] {
            store.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_store() {
        let store = MemoryPreferenceStore::new();
        let prefs = Preferences {
            language: Locale::En,
            theme: Theme::Dark,
            incognito: true,
        };
        prefs.save(&store);

        assert_eq!(store.get(LANGUAGE_KEY).as_deref(), Some("en"));
        assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("true"));
        assert_eq!(Preferences::load(&store, Preferences::default()), prefs);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let store = MemoryPreferenceStore::new();
        store.set(LANGUAGE_KEY, "klingon");
        store.set(DARK_MODE_KEY, "maybe");

        let defaults = Preferences {
            language: Locale::En,
            theme: Theme::Dark,
            incognito: false,
        };
        assert_eq!(Preferences::load(&store, defaults), defaults);
    }

    #[test]
    fn test_scoped_stores_are_isolated() {
        let shared: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferenceStore::new());
        let a = ScopedStore::new(shared.clone(), "a");
        let b = ScopedStore::new(shared.clone(), "b");

        a.set(INCOGNITO_KEY, "true");

        assert_eq!(a.get(INCOGNITO_KEY).as_deref(), Some("true"));
        assert_eq!(b.get(INCOGNITO_KEY), None);
        assert_eq!(shared.get("a:amanda-incognito").as_deref(), Some("true"));
    }

    #[test]
    fn test_clear_removes_only_own_scope() {
        let memory = Arc::new(MemoryPreferenceStore::new());
        let shared: Arc<dyn PreferenceStore> = memory.clone();
        let a = ScopedStore::new(shared.clone(), "a");
        let b = ScopedStore::new(shared, "b");
        Preferences::default().save(&a);
        Preferences::default().save(&b);
        assert_eq!(memory.len(), 6);

        Preferences::clear(&a);

        assert_eq!(memory.len(), 3);
        assert_eq!(a.get(LANGUAGE_KEY), None);
        assert_eq!(b.get(LANGUAGE_KEY).as_deref(), Some("ru"));
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert!(Theme::Light.toggled().is_dark());
    }
}
