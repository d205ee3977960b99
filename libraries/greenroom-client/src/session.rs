//! Session store: the one owner of the in-memory auth state.

use greenroom_core::User;
use tokio::sync::watch;
use tracing::info;

/// Tokens and user of the signed-in account
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            user: None,
        }
    }
}

/// Holds the current session and notifies subscribers of every change.
///
/// Created once at app start and shared behind an `Arc`; `clear` is the
/// logout path. Subscribers (e.g. persistence) receive every replacement.
#[derive(Debug)]
pub struct SessionStore {
    state: watch::Sender<Option<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a signed-out store
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    /// Create a store restored from a saved session
    pub fn with_session(session: Session) -> Self {
        let (state, _) = watch::channel(Some(session));
        Self { state }
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|s| s.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state
            .borrow()
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().as_ref().and_then(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Replace the whole session (login)
    pub fn set_session(&self, session: Session) {
        self.state.send_replace(Some(session));
    }

    /// Store refreshed tokens; a missing refresh token keeps the old one.
    ///
    /// Returns `false` and changes nothing when signed out, so a refresh
    /// that lands after logout cannot sign the user back in.
    pub fn update_tokens(&self, access_token: String, refresh_token: Option<String>) -> bool {
        self.state.send_if_modified(|state| {
            let Some(session) = state.as_mut() else {
                return false;
            };
            session.access_token = access_token;
            if refresh_token.is_some() {
                session.refresh_token = refresh_token;
            }
            true
        })
    }

    /// Attach the fetched user to the current session
    pub fn set_user(&self, user: User) {
        self.state.send_modify(|state| {
            if let Some(session) = state {
                session.user = Some(user);
            }
        });
    }

    /// Forget everything (logout or unrecoverable expiry)
    pub fn clear(&self) {
        if self.state.send_replace(None).is_some() {
            info!("Session cleared");
        }
    }

    /// Watch session changes
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }
}
