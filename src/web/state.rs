//! Application state shared across handlers

use crate::auth::{IdentityService, LocalIdentity};
use crate::config::Settings;
use crate::providers::SearchProvider;
use crate::session::{SessionFactory, SessionStore};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Live sessions
    pub sessions: Arc<SessionStore>,
    /// Identity collaborator
    pub identity: Arc<dyn IdentityService>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state around a provider
    pub fn new(settings: Settings, provider: Arc<dyn SearchProvider>) -> anyhow::Result<Self> {
        let identity = Arc::new(LocalIdentity::new(&settings.auth));
        Self::with_identity(settings, provider, identity)
    }

    /// Create application state with another identity collaborator
    pub fn with_identity(
        settings: Settings,
        provider: Arc<dyn SearchProvider>,
        identity: Arc<dyn IdentityService>,
    ) -> anyhow::Result<Self> {
        let factory = SessionFactory::new(provider, &settings);
        let sessions = Arc::new(SessionStore::from_settings(
            factory,
            identity.clone(),
            &settings,
        ));
        let templates = Arc::new(super::Templates::new()?);

        Ok(Self {
            settings: Arc::new(settings),
            sessions,
            identity,
            templates,
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }

    /// Whether searching requires a signed-in user
    pub fn auth_required(&self) -> bool {
        self.settings.auth.required
    }
}
