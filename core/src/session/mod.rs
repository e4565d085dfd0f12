//! Session context and lifecycle.
//!
//! # Design
//! A `Session` is created once and shared (`Arc`) by everything that needs
//! the signed-in user: the `AuthHeader` and `SessionGuard` interceptors read
//! and clear it, `AuthService` writes it. The persisted fields live in a
//! `SessionStore` under three fixed keys. The lifecycle state is published
//! on a `watch` channel, and discrete happenings (login, refresh, logout,
//! expiry) on a `broadcast` channel so a UI can react, e.g. navigate to the
//! login entry point on `SessionEvent::Expired`.
//!
//! No lock spans a network call. A refresh racing a logout is last writer
//! wins on the store.

mod service;
mod store;

use std::fmt;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::types::{AuthUser, LoginResponse, TokenPair};

pub use service::AuthService;
pub use store::{MemoryStore, SessionStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};

const EVENT_CAPACITY: usize = 16;

/// Lifecycle state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated,
    Refreshing,
}

/// Inputs driving `SessionState` transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionInput {
    LoginSubmitted,
    LoginSucceeded,
    LoginRejected,
    RefreshRequested,
    RefreshSucceeded,
    RefreshFailed,
    Unauthorized,
    Logout,
}

impl SessionState {
    /// Transition function. Inputs that make no sense in the current state
    /// leave it unchanged.
    pub fn next(self, input: SessionInput) -> SessionState {
        use SessionInput::*;
        use SessionState::*;
        match (self, input) {
            (_, Logout) | (_, Unauthorized) => Anonymous,
            (Anonymous | Authenticated, LoginSubmitted) => Authenticating,
            (Authenticating, LoginSucceeded) => Authenticated,
            (Authenticating, LoginRejected) => Anonymous,
            (Authenticated, RefreshRequested) => Refreshing,
            (Refreshing, RefreshSucceeded) => Authenticated,
            (Refreshing, RefreshFailed) => Anonymous,
            (state, _) => state,
        }
    }
}

/// Things a session observer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { user_id: u64 },
    Refreshed,
    LoggedOut,
    /// The upstream rejected the session (401). Navigate to login.
    Expired,
}

pub struct Session {
    store: Arc<dyn SessionStore>,
    state: watch::Sender<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Starts `Authenticated` when the store already holds a token and a
    /// user profile, `Anonymous` otherwise.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let session = Self {
            store,
            state: watch::Sender::new(SessionState::Anonymous),
            events,
        };
        if session.is_authenticated() {
            session.state.send_replace(SessionState::Authenticated);
        }
        session
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    /// Stored profile snapshot. A malformed entry reads as absent.
    pub fn user(&self) -> Option<AuthUser> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(%err, "discarding malformed stored user");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some() && self.user().is_some()
    }

    /// Apply `input` to the state machine and return the new state.
    pub fn apply(&self, input: SessionInput) -> SessionState {
        let mut next = SessionState::Anonymous;
        self.state.send_modify(|state| {
            next = state.next(input);
            if next != *state {
                debug!(from = ?*state, to = ?next, ?input, "session transition");
            }
            *state = next;
        });
        next
    }

    pub(crate) fn establish(&self, login: &LoginResponse) -> Result<(), serde_json::Error> {
        let profile = serde_json::to_string(&login.user)?;
        self.store.set(ACCESS_TOKEN_KEY, login.access_token.clone());
        self.store.set(REFRESH_TOKEN_KEY, login.refresh_token.clone());
        self.store.set(USER_KEY, profile);
        Ok(())
    }

    pub(crate) fn update_tokens(&self, tokens: &TokenPair) {
        self.store.set(ACCESS_TOKEN_KEY, tokens.access_token.clone());
        self.store.set(REFRESH_TOKEN_KEY, tokens.refresh_token.clone());
    }

    /// Remove all three persisted fields.
    pub(crate) fn clear(&self) {
        self.store.remove(ACCESS_TOKEN_KEY);
        self.store.remove(REFRESH_TOKEN_KEY);
        self.store.remove(USER_KEY);
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    pub fn logout(&self) {
        self.clear();
        self.apply(SessionInput::Logout);
        self.emit(SessionEvent::LoggedOut);
    }

    /// Forced logout after the upstream answered 401.
    pub fn expire(&self) {
        self.clear();
        self.apply(SessionInput::Unauthorized);
        self.emit(SessionEvent::Expired);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("has_token", &self.access_token().is_some())
            .finish()
    }
}
