//! `/auth` endpoints.

use std::sync::Arc;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::request::RequestConfig;
use crate::types::{AuthUser, LoginRequest, LoginResponse, RefreshRequest, TokenPair};

use super::{call, json_body};

#[derive(Clone)]
pub struct AuthApi {
    http: Arc<HttpClient>,
}

impl AuthApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub fn login_request(credentials: &LoginRequest) -> Result<RequestConfig, ApiError> {
        Ok(RequestConfig::post("/auth/login", json_body(credentials)?))
    }

    pub fn me_request() -> RequestConfig {
        RequestConfig::get("/auth/me")
    }

    pub fn refresh_request(refresh: &RefreshRequest) -> Result<RequestConfig, ApiError> {
        Ok(RequestConfig::post("/auth/refresh", json_body(refresh)?))
    }

    /// Exchange credentials for a token pair and profile. Does not touch the
    /// session; `AuthService` does that.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        call(&self.http, "auth.login", Self::login_request(credentials)?).await
    }

    /// Profile of the bearer of the current access token.
    pub async fn me(&self) -> Result<AuthUser, ApiError> {
        call(&self.http, "auth.me", Self::me_request()).await
    }

    pub async fn refresh(&self, refresh: &RefreshRequest) -> Result<TokenPair, ApiError> {
        call(&self.http, "auth.refresh", Self::refresh_request(refresh)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::request::RequestBody;
    use serde_json::json;

    #[test]
    fn login_posts_credentials() {
        let mut credentials = LoginRequest::new("emilys", "emilyspass");
        credentials.expires_in_mins = Some(30);
        let config = AuthApi::login_request(&credentials).unwrap();

        assert_eq!(config.method, HttpMethod::Post);
        assert_eq!(config.url.as_deref(), Some("/auth/login"));
        assert_eq!(
            config.data,
            Some(RequestBody::Json(json!({
                "username": "emilys",
                "password": "emilyspass",
                "expiresInMins": 30
            })))
        );
    }

    #[test]
    fn refresh_posts_token_in_body() {
        let config = AuthApi::refresh_request(&RefreshRequest {
            refresh_token: Some("ref1".to_string()),
            expires_in_mins: Some(60),
        })
        .unwrap();
        assert_eq!(config.url.as_deref(), Some("/auth/refresh"));
        assert_eq!(
            config.data,
            Some(RequestBody::Json(json!({"refreshToken": "ref1", "expiresInMins": 60})))
        );
    }

    #[test]
    fn me_is_a_plain_get() {
        let config = AuthApi::me_request();
        assert_eq!(config.method, HttpMethod::Get);
        assert_eq!(config.url.as_deref(), Some("/auth/me"));
        assert!(config.params.is_empty());
    }
}
