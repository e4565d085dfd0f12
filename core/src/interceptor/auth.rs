use std::sync::Arc;

use async_trait::async_trait;

use super::RequestInterceptor;
use crate::error::TransportError;
use crate::request::RequestConfig;
use crate::session::Session;

/// Attaches `Authorization: Bearer <token>` when the session holds an access
/// token. The token is read at request-build time, never cached.
#[derive(Debug, Clone)]
pub struct AuthHeader {
    session: Arc<Session>,
}

impl AuthHeader {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl RequestInterceptor for AuthHeader {
    async fn on_request(&self, mut config: RequestConfig) -> Result<RequestConfig, TransportError> {
        if let Some(token) = self.session.access_token() {
            config.headers.insert("Authorization", format!("Bearer {token}"));
        }
        Ok(config)
    }
}
