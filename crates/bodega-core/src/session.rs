// ── Session accessor ──
//
// The bearer token and cached user profile, behind an injected provider.
// Tokens never expire client-side: one stays in place until `clear()`,
// even after the API has started rejecting it.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SessionError;
use crate::model::User;

/// An authenticated session: the token plus the profile returned at login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: User,
}

/// On-disk shape of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.expose_secret().to_owned(),
            user: session.user.clone(),
        }
    }
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Self {
            token: SecretString::from(stored.token),
            user: stored.user,
        }
    }
}

/// Where actions read and write the current session.
pub trait SessionProvider: Send + Sync {
    /// Current bearer token, if logged in.
    fn token(&self) -> Option<SecretString>;

    /// Cached profile; never contacts the API.
    fn user(&self) -> Option<User>;

    /// Store token and profile together.
    fn set(&self, token: SecretString, user: User) -> Result<(), SessionError>;

    /// Drop both token and profile.
    fn clear(&self) -> Result<(), SessionError>;

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Replace the cached profile, keeping the token. No-op when logged out.
    fn refresh_user(&self, user: User) -> Result<(), SessionError> {
        match self.token() {
            Some(token) => self.set(token, user),
            None => Ok(()),
        }
    }
}

/// Process-local session. Token and profile swap in one atomic store.
#[derive(Debug, Default)]
pub struct MemorySession {
    current: ArcSwapOption<Session>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            current: ArcSwapOption::from_pointee(session),
        }
    }

    pub fn snapshot(&self) -> Option<Arc<Session>> {
        self.current.load_full()
    }
}

impl SessionProvider for MemorySession {
    fn token(&self) -> Option<SecretString> {
        self.current.load_full().map(|s| s.token.clone())
    }

    fn user(&self) -> Option<User> {
        self.current.load_full().map(|s| s.user.clone())
    }

    fn set(&self, token: SecretString, user: User) -> Result<(), SessionError> {
        info!(user = %user.email, role = %user.role, "session stored");
        self.current.store(Some(Arc::new(Session { token, user })));
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if self.current.swap(None).is_some() {
            info!("session cleared");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{DocumentType, Role};

    pub(crate) fn sample_user(role: Role) -> User {
        User {
            id: "u1".into(),
            name: "Ana".into(),
            last_name: "Pérez".into(),
            id_number: "123".into(),
            type_document: DocumentType::Cc,
            phone: "300".into(),
            email: "ana@example.com".into(),
            role,
            status: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn set_and_clear_move_token_and_user_together() {
        let session = MemorySession::new();
        assert!(!session.is_authenticated());

        session
            .set("t".to_string().into(), sample_user(Role::Admin))
            .unwrap();
        assert_eq!(session.token().unwrap().expose_secret(), "t");
        assert_eq!(session.user().unwrap().role, Role::Admin);

        session.clear().unwrap();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn refresh_user_keeps_token() {
        let session = MemorySession::new();
        session
            .set("t".to_string().into(), sample_user(Role::Seller))
            .unwrap();

        let mut updated = sample_user(Role::Seller);
        updated.phone = "311".into();
        session.refresh_user(updated).unwrap();

        assert_eq!(session.token().unwrap().expose_secret(), "t");
        assert_eq!(session.user().unwrap().phone, "311");
    }

    #[test]
    fn refresh_user_without_session_is_noop() {
        let session = MemorySession::new();
        session.refresh_user(sample_user(Role::Admin)).unwrap();
        assert!(session.user().is_none());
    }
}
