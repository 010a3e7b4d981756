//! Identity collaborator
//!
//! The search page only needs to know whether a user is present and how to
//! sign in and out. [`LocalIdentity`] checks the shape of the credentials and
//! remembers the signed-in email per session; it verifies nothing.

use crate::config::AuthSettings;
use crate::locales::{tr, Locale};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::info;
use uuid::Uuid;

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("password shorter than {min} characters")]
    ShortPassword { min: usize },
}

impl AuthError {
    /// Message shown on the sign-in form
    pub fn localized(&self, locale: Locale) -> &'static str {
        match self {
            Self::InvalidEmail => tr(locale, "invalid_email"),
            Self::ShortPassword { .. } => tr(locale, "short_password"),
        }
    }
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn current_user(&self, session: Uuid) -> Option<User>;
    async fn sign_in(&self, session: Uuid, email: &str, password: &str) -> Result<User, AuthError>;
    async fn sign_out(&self, session: Uuid);
}

/// In-memory identity keyed by session id
pub struct LocalIdentity {
    users: RwLock<HashMap<Uuid, User>>,
    min_password_len: usize,
}

impl LocalIdentity {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            min_password_len: settings.min_password_len,
        }
    }
}

impl Default for LocalIdentity {
    fn default() -> Self {
        Self::new(&AuthSettings::default())
    }
}

#[async_trait]
impl IdentityService for LocalIdentity {
    async fn current_user(&self, session: Uuid) -> Option<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&session)
            .cloned()
    }

    async fn sign_in(&self, session: Uuid, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < self.min_password_len {
            return Err(AuthError::ShortPassword {
                min: self.min_password_len,
            });
        }

        let user = User {
            email: email.to_string(),
        };
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session, user.clone());
        info!("Session {} signed in", session);
        Ok(user)
    }

    async fn sign_out(&self, session: Uuid) {
        let removed = self
            .users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&session);
        if removed.is_some() {
            info!("Session {} signed out", session);
        }
    }
}

/// `local@domain.tld` with no whitespace
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("amanda@example.com"));
        assert!(is_valid_email("a.b@mail.example.org"));
        assert!(!is_valid_email("amanda"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("amanda@example"));
        assert!(!is_valid_email("amanda@.com"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let identity = LocalIdentity::default();
        let session = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert_eq!(identity.current_user(session).await, None);

        let user = identity
            .sign_in(session, " amanda@example.com ", "secret1")
            .await
            .unwrap();
        assert_eq!(user.email, "amanda@example.com");
        assert_eq!(identity.current_user(session).await, Some(user));
        assert_eq!(identity.current_user(other).await, None);

        identity.sign_out(session).await;
        assert_eq!(identity.current_user(session).await, None);
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let identity = LocalIdentity::default();
        let session = Uuid::new_v4();

        let err = identity.sign_in(session, "nope", "secret1").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidEmail);
        assert_eq!(err.localized(Locale::En), "Enter a valid email address");

        let err = identity
            .sign_in(session, "amanda@example.com", "12345")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::ShortPassword { min: 6 });
        assert_eq!(identity.current_user(session).await, None);
    }
}
