use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::{RequestInterceptor, ResponseInterceptor};
use crate::error::TransportError;
use crate::request::RequestConfig;
use crate::response::Response;

/// Logs every exchange. Registered on both chains; never alters traffic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrafficLogger;

#[async_trait]
impl RequestInterceptor for TrafficLogger {
    async fn on_request(&self, config: RequestConfig) -> Result<RequestConfig, TransportError> {
        debug!(
            method = %config.method,
            base_url = config.base_url.as_deref().unwrap_or(""),
            url = config.url.as_deref().unwrap_or(""),
            "sending request"
        );
        Ok(config)
    }

    async fn on_request_error(&self, error: &TransportError) {
        error!(%error, "request interceptor error");
    }
}

#[async_trait]
impl ResponseInterceptor for TrafficLogger {
    async fn on_response(&self, response: Response) -> Result<Response, TransportError> {
        debug!(status = response.status, status_text = %response.status_text, "response received");
        Ok(response)
    }

    async fn on_error(&self, error: &TransportError) -> Result<Response, TransportError> {
        match &error.response {
            Some(response) => warn!(
                status = response.status,
                data = ?response.data,
                "api error: {}",
                error.message
            ),
            None => warn!(code = ?error.code, "api error, no response received: {}", error.message),
        }
        Err(error.clone())
    }
}
