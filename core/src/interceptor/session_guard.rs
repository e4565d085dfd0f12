use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ResponseInterceptor;
use crate::error::TransportError;
use crate::response::Response;
use crate::session::Session;

/// Tears the session down when any call comes back 401.
///
/// Clearing emits `SessionEvent::Expired`; whoever owns navigation subscribes
/// to that signal and sends the user to the login entry point. The error
/// itself still propagates to the caller.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    session: Arc<Session>,
}

impl SessionGuard {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ResponseInterceptor for SessionGuard {
    async fn on_error(&self, error: &TransportError) -> Result<Response, TransportError> {
        if error.status() == Some(401) {
            info!("unauthorized response, clearing session");
            self.session.expire();
        }
        Err(error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::request::RequestConfig;
    use crate::session::{
        MemoryStore, SessionEvent, SessionState, SessionStore, ACCESS_TOKEN_KEY,
        REFRESH_TOKEN_KEY, USER_KEY,
    };

    fn rejected(status: u16) -> TransportError {
        let raw = HttpResponse {
            status,
            status_text: String::new(),
            headers: Vec::new(),
            body: String::new(),
        };
        let config = RequestConfig::get("/users");
        TransportError::bad_response(config.clone(), Response::from_http(raw, config))
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.set(ACCESS_TOKEN_KEY, "tok1".to_string());
        store.set(REFRESH_TOKEN_KEY, "ref1".to_string());
        store.set(USER_KEY, r#"{"id":1,"username":"emilys"}"#.to_string());
        store
    }

    #[tokio::test]
    async fn unauthorized_clears_session_and_signals_expiry() {
        let store = seeded_store();
        let session = Arc::new(Session::new(store.clone()));
        let mut events = session.subscribe();
        let guard = SessionGuard::new(session.clone());

        let err = guard.on_error(&rejected(401)).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(store.is_empty());
        assert_eq!(session.state(), SessionState::Anonymous);
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn other_statuses_leave_session_alone() {
        let store = seeded_store();
        let session = Arc::new(Session::new(store.clone()));
        let guard = SessionGuard::new(session.clone());

        guard.on_error(&rejected(500)).await.unwrap_err();
        assert_eq!(store.len(), 3);
        assert_eq!(session.state(), SessionState::Authenticated);
    }
}
