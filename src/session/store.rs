//! Session storage with idle expiry

use super::Session;
use crate::auth::IdentityService;
use crate::config::Settings;
use crate::history::SearchHistory;
use crate::locales::Locale;
use crate::preferences::{MemoryPreferenceStore, PreferenceStore, Preferences, ScopedStore};
use crate::providers::SearchProvider;
use crate::search::{DispatchOptions, Dispatcher};
use moka::future::Cache;
use moka::notification::{ListenerFuture, RemovalCause};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Builds new sessions from the shared provider and settings
pub struct SessionFactory {
    provider: Arc<dyn SearchProvider>,
    options: DispatchOptions,
    history: crate::config::HistorySettings,
    defaults: Preferences,
    preferences: Arc<dyn PreferenceStore>,
}

impl SessionFactory {
    pub fn new(provider: Arc<dyn SearchProvider>, settings: &Settings) -> Self {
        Self {
            provider,
            options: DispatchOptions {
                timeout: settings.dispatch.timeout(),
                max_retries: settings.dispatch.max_retries,
            },
            history: settings.history.clone(),
            defaults: Preferences {
                language: settings.ui.default_locale,
                theme: settings.ui.default_theme,
                incognito: false,
            },
            preferences: Arc::new(MemoryPreferenceStore::new()),
        }
    }

    /// Use another backing store for preferences
    pub fn with_preference_store(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = store;
        self
    }

    /// A fresh session; `language` overrides the default when the store
    /// has nothing saved
    pub fn create(&self, id: Uuid, language: Option<Locale>) -> Session {
        let mut defaults = self.defaults;
        if let Some(language) = language {
            defaults.language = language;
        }

        Session::new(
            id,
            Dispatcher::new(self.provider.clone()).with_options(self.options),
            SearchHistory::with_settings(&self.history),
            Box::new(ScopedStore::new(self.preferences.clone(), id.to_string())),
            defaults,
        )
    }
}

/// Live sessions keyed by cookie id
///
/// A session leaving the cache, by idling out, capacity eviction or
/// [`SessionStore::remove`], has its saved preferences cleared and its user
/// signed out.
pub struct SessionStore {
    cache: Cache<Uuid, Arc<Session>>,
    factory: SessionFactory,
}

impl SessionStore {
    /// Create a store dropping sessions idle for `ttl_seconds`
    pub fn new(
        factory: SessionFactory,
        identity: Arc<dyn IdentityService>,
        ttl_seconds: u64,
        max_capacity: u64,
    ) -> Self {
        let on_end = move |id: Arc<Uuid>, session: Arc<Session>, cause: RemovalCause| -> ListenerFuture {
            let identity = identity.clone();
            Box::pin(async move {
                if cause == RemovalCause::Replaced {
                    return;
                }
                session.end();
                identity.sign_out(*id).await;
                debug!("Session {} ended: {:?}", id, cause);
            })
        };

        let cache: Cache<Uuid, Arc<Session>> = Cache::builder()
            .time_to_idle(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .async_eviction_listener(on_end)
            .build();

        Self { cache, factory }
    }

    pub fn from_settings(
        factory: SessionFactory,
        identity: Arc<dyn IdentityService>,
        settings: &Settings,
    ) -> Self {
        Self::new(
            factory,
            identity,
            settings.server.session_ttl,
            settings.server.max_sessions,
        )
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        self.cache.get(id).await
    }

    /// Start a new session under a fresh id
    pub async fn create(&self, language: Option<Locale>) -> Arc<Session> {
        let id = Uuid::new_v4();
        let session = Arc::new(self.factory.create(id, language));
        self.cache.insert(id, session.clone()).await;
        debug!("Created session {}", id);
        session
    }

    /// Existing session for `id`, or a new one
    pub async fn get_or_create(&self, id: Option<Uuid>, language: Option<Locale>) -> (Arc<Session>, bool) {
        if let Some(id) = id {
            if let Some(session) = self.get(&id).await {
                return (session, false);
            }
        }
        (self.create(language).await, true)
    }

    pub async fn remove(&self, id: &Uuid) {
        self.cache.invalidate(id).await;
    }

    /// Approximate number of live sessions
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LocalIdentity;
    use crate::config::ProviderKind;
    use crate::preferences::MemoryPreferenceStore;
    use crate::providers::MockProvider;

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.provider.kind = ProviderKind::Mock;
        settings.ui.default_locale = Locale::En;
        settings
    }

    fn store() -> SessionStore {
        let settings = settings();
        let factory = SessionFactory::new(Arc::new(MockProvider::new()), &settings);
        SessionStore::from_settings(factory, Arc::new(LocalIdentity::default()), &settings)
    }

    /// A store with a short idle timeout over inspectable collaborators
    fn observed_store(
        ttl_seconds: u64,
    ) -> (SessionStore, Arc<MemoryPreferenceStore>, Arc<LocalIdentity>) {
        let preferences = Arc::new(MemoryPreferenceStore::new());
        let identity = Arc::new(LocalIdentity::default());
        let factory = SessionFactory::new(Arc::new(MockProvider::new()), &settings())
            .with_preference_store(preferences.clone());
        let store = SessionStore::new(factory, identity.clone(), ttl_seconds, 100);
        (store, preferences, identity)
    }

    #[tokio::test]
    async fn test_get_or_create() {
        let store = store();

        let (first, created) = store.get_or_create(None, None).await;
        assert!(created);
        assert_eq!(first.language(), Locale::En);

        let (again, created) = store.get_or_create(Some(first.id()), None).await;
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &again));

        let (other, created) = store.get_or_create(Some(Uuid::new_v4()), Some(Locale::Ru)).await;
        assert!(created);
        assert_ne!(other.id(), first.id());
        assert_eq!(other.language(), Locale::Ru);
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_state() {
        let store = store();
        let (a, _) = store.get_or_create(None, None).await;
        let (b, _) = store.get_or_create(None, None).await;

        a.set_incognito(true);
        a.submit("cats", crate::search::SearchMode::Web).await;
        b.submit("dogs", crate::search::SearchMode::Web).await;

        assert!(a.history().is_empty());
        assert_eq!(b.history().len(), 1);
        assert!(!b.preferences().incognito);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = store();
        let session = store.create(None).await;
        assert!(store.get(&session.id()).await.is_some());

        store.remove(&session.id()).await;
        assert!(store.get(&session.id()).await.is_none());
    }

    #[tokio::test]
    async fn test_idle_sessions_release_their_state() {
        let (store, preferences, identity) = observed_store(1);

        let mut ids = Vec::new();
        for i in 0..20 {
            let session = store.create(None).await;
            session.toggle_theme();
            identity
                .sign_in(session.id(), &format!("user{}@example.com", i), "secret1")
                .await
                .unwrap();
            ids.push(session.id());
        }
        assert!(!preferences.is_empty());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        store.cache.run_pending_tasks().await;

        assert_eq!(store.len(), 0);
        assert!(preferences.is_empty());
        for id in ids {
            assert_eq!(identity.current_user(id).await, None);
        }
    }

    #[tokio::test]
    async fn test_removed_session_releases_its_state() {
        let (store, preferences, identity) = observed_store(60);
        let kept = store.create(None).await;
        let gone = store.create(None).await;
        kept.set_incognito(true);
        gone.set_incognito(true);
        identity
            .sign_in(gone.id(), "amanda@example.com", "secret1")
            .await
            .unwrap();

        store.remove(&gone.id()).await;
        store.cache.run_pending_tasks().await;

        assert_eq!(preferences.len(), 3);
        assert_eq!(identity.current_user(gone.id()).await, None);
        assert!(store.get(&kept.id()).await.unwrap().preferences().incognito);
    }
}
