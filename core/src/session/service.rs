//! Login, refresh and logout on top of `AuthApi` and `Session`.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::AuthApi;
use crate::error::ApiError;
use crate::types::{
    AuthUser, LoginRequest, LoginResponse, RefreshRequest, TokenPair, DEFAULT_TOKEN_MINUTES,
};

use super::{Session, SessionEvent, SessionInput};

#[derive(Clone)]
pub struct AuthService {
    api: AuthApi,
    session: Arc<Session>,
}

impl AuthService {
    pub fn new(api: AuthApi, session: Arc<Session>) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Exchange credentials and persist the session. On rejection nothing is
    /// left in the store and the error is returned to the caller.
    pub async fn login(&self, mut credentials: LoginRequest) -> Result<LoginResponse, ApiError> {
        if credentials.expires_in_mins.is_none() {
            credentials.expires_in_mins = Some(DEFAULT_TOKEN_MINUTES);
        }
        self.session.apply(SessionInput::LoginSubmitted);

        let outcome = match self.api.login(&credentials).await {
            Ok(login) => self.session.establish(&login).map(|_| login).map_err(ApiError::from),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(login) => {
                self.session.apply(SessionInput::LoginSucceeded);
                self.session.emit(SessionEvent::LoggedIn {
                    user_id: login.user.id,
                });
                info!(user = %login.user.username, "signed in");
                Ok(login)
            }
            Err(err) => {
                self.session.clear();
                self.session.apply(SessionInput::LoginRejected);
                error!(%err, "login failed");
                Err(err)
            }
        }
    }

    /// Fresh profile for the current token.
    pub async fn current_user(&self) -> Result<AuthUser, ApiError> {
        self.api.me().await
    }

    /// Trade the stored refresh token for a new pair. A failed refresh ends
    /// the session.
    pub async fn refresh(&self) -> Result<TokenPair, ApiError> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or_else(|| ApiError::Session("No refresh token available".to_string()))?;

        self.session.apply(SessionInput::RefreshRequested);
        let request = RefreshRequest {
            refresh_token: Some(refresh_token),
            expires_in_mins: Some(DEFAULT_TOKEN_MINUTES),
        };

        match self.api.refresh(&request).await {
            Ok(tokens) => {
                self.session.update_tokens(&tokens);
                self.session.apply(SessionInput::RefreshSucceeded);
                self.session.emit(SessionEvent::Refreshed);
                Ok(tokens)
            }
            Err(err) => {
                warn!(%err, "token refresh failed, signing out");
                self.session.clear();
                self.session.apply(SessionInput::RefreshFailed);
                self.session.emit(SessionEvent::LoggedOut);
                Err(err)
            }
        }
    }

    pub fn logout(&self) {
        self.session.logout();
        info!("signed out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Profile persisted by the last login, if the session is still valid.
    pub fn restore(&self) -> Option<AuthUser> {
        if self.session.is_authenticated() {
            self.session.user()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpClient;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::request::RequestConfig;
    use crate::session::{MemoryStore, SessionState, SessionStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
    use crate::transport::{Transport, TransportFailure};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers every request with the next scripted reply.
    struct Script {
        replies: Mutex<Vec<(u16, &'static str)>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl Transport for Script {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
            self.seen.lock().unwrap().push(request);
            let (status, body) = self.replies.lock().unwrap().remove(0);
            Ok(HttpResponse {
                status,
                status_text: String::new(),
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: body.to_string(),
            })
        }
    }

    const LOGIN_OK: &str = r#"{"id":1,"username":"emilys","email":"emily.johnson@x.dummyjson.com",
        "firstName":"Emily","lastName":"Johnson","gender":"female","image":"",
        "accessToken":"tok1","refreshToken":"ref1"}"#;

    fn service(replies: Vec<(u16, &'static str)>) -> (AuthService, Arc<MemoryStore>, Arc<Script>) {
        let script = Arc::new(Script {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        });
        let http = Arc::new(HttpClient::new(RequestConfig::default(), script.clone()));
        let store = Arc::new(MemoryStore::new());
        let session = Arc::new(Session::new(store.clone()));
        (AuthService::new(AuthApi::new(http), session), store, script)
    }

    #[tokio::test]
    async fn login_persists_session() {
        let (auth, store, script) = service(vec![(200, LOGIN_OK)]);
        let mut events = auth.session().subscribe();

        let login = auth.login(LoginRequest::new("emilys", "emilyspass")).await.unwrap();
        assert_eq!(login.access_token, "tok1");
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("tok1"));
        assert_eq!(auth.session().state(), SessionState::Authenticated);
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedIn { user_id: 1 });
        assert_eq!(auth.restore().unwrap().username, "emilys");

        let body = script.seen.lock().unwrap()[0].body.clone().unwrap();
        assert!(body.contains(r#""expiresInMins":60"#));
    }

    #[tokio::test]
    async fn rejected_login_leaves_nothing_behind() {
        let (auth, store, _) = service(vec![(400, r#"{"message":"Invalid credentials"}"#)]);
        let err = auth.login(LoginRequest::new("emilys", "wrong")).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(store.is_empty());
        assert_eq!(auth.session().state(), SessionState::Anonymous);
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn refresh_overwrites_tokens() {
        let (auth, store, _) = service(vec![
            (200, LOGIN_OK),
            (200, r#"{"accessToken":"tok2","refreshToken":"ref2"}"#),
        ]);
        auth.login(LoginRequest::new("emilys", "emilyspass")).await.unwrap();

        let tokens = auth.refresh().await.unwrap();
        assert_eq!(tokens.access_token, "tok2");
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref2"));
        assert_eq!(auth.session().state(), SessionState::Authenticated);
    }

    #[tokio::test]
    async fn failed_refresh_signs_out() {
        let (auth, store, _) = service(vec![
            (200, LOGIN_OK),
            (403, r#"{"message":"Invalid refresh token"}"#),
        ]);
        auth.login(LoginRequest::new("emilys", "emilyspass")).await.unwrap();

        let err = auth.refresh().await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(store.is_empty());
        assert_eq!(auth.session().state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn refresh_without_token_is_a_session_error() {
        let (auth, _, script) = service(Vec::new());
        let err = auth.refresh().await.unwrap_err();
        assert_eq!(err, ApiError::Session("No refresh token available".to_string()));
        assert!(script.seen.lock().unwrap().is_empty());
    }
}
