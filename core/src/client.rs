//! Request pipeline: config merge, interceptors, transport, normalization.
//!
//! # Design
//! `HttpClient` holds instance defaults, the two interceptor chains and a
//! `Transport`. One call runs:
//!
//! 1. merge the per-call `RequestConfig` onto the defaults,
//! 2. request interceptors in registration order,
//! 3. prepare an `HttpRequest` (URL with query string, body for
//!    POST/PUT/PATCH only) and hand it to the transport,
//! 4. parse the body and check the status against the acceptance predicate,
//! 5. response interceptors: the success path on accepted statuses, the
//!    failure path on rejected statuses and on no-response failures.
//!
//! The client holds no per-call state, so it is shared behind an `Arc`.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest};
use crate::interceptor::{run_error_phase, run_request_phase, run_response_phase, Interceptors};
use crate::request::{RequestBody, RequestConfig};
use crate::response::Response;
use crate::transport::{ReqwestTransport, Transport, TransportFailure};

pub struct HttpClient {
    defaults: RequestConfig,
    transport: Arc<dyn Transport>,
    interceptors: Interceptors,
}

impl HttpClient {
    pub fn new(defaults: RequestConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            defaults,
            transport,
            interceptors: Interceptors::default(),
        }
    }

    /// Client for `config.base_url` over `reqwest`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.defaults(), Arc::new(ReqwestTransport::new()))
    }

    pub fn defaults(&self) -> &RequestConfig {
        &self.defaults
    }

    pub fn interceptors(&self) -> &Interceptors {
        &self.interceptors
    }

    pub async fn request(&self, config: RequestConfig) -> Result<Response, TransportError> {
        let merged = RequestConfig::merge(&self.defaults, config);
        let request_handlers = self.interceptors.request.snapshot();
        let response_handlers = self.interceptors.response.snapshot();

        let config = run_request_phase(&request_handlers, merged).await?;
        match self.dispatch(config).await {
            Ok(response) => run_response_phase(&response_handlers, response).await,
            Err(error) => run_error_phase(&response_handlers, error).await,
        }
    }

    pub async fn get(&self, url: impl Into<String>) -> Result<Response, TransportError> {
        self.request(RequestConfig::new(HttpMethod::Get, url)).await
    }

    pub async fn delete(&self, url: impl Into<String>) -> Result<Response, TransportError> {
        self.request(RequestConfig::new(HttpMethod::Delete, url)).await
    }

    pub async fn head(&self, url: impl Into<String>) -> Result<Response, TransportError> {
        self.request(RequestConfig::new(HttpMethod::Head, url)).await
    }

    pub async fn options(&self, url: impl Into<String>) -> Result<Response, TransportError> {
        self.request(RequestConfig::new(HttpMethod::Options, url)).await
    }

    pub async fn post(
        &self,
        url: impl Into<String>,
        data: RequestBody,
    ) -> Result<Response, TransportError> {
        self.request(RequestConfig::new(HttpMethod::Post, url).with_data(data)).await
    }

    pub async fn put(
        &self,
        url: impl Into<String>,
        data: RequestBody,
    ) -> Result<Response, TransportError> {
        self.request(RequestConfig::new(HttpMethod::Put, url).with_data(data)).await
    }

    pub async fn patch(
        &self,
        url: impl Into<String>,
        data: RequestBody,
    ) -> Result<Response, TransportError> {
        self.request(RequestConfig::new(HttpMethod::Patch, url).with_data(data)).await
    }

    async fn dispatch(&self, config: RequestConfig) -> Result<Response, TransportError> {
        let request = match prepare(&config) {
            Ok(request) => request,
            Err(message) => return Err(TransportError::serialization(message, config)),
        };

        let raw = match self.transport.send(request).await {
            Ok(raw) => raw,
            Err(failure @ TransportFailure::Timeout(_)) => {
                return Err(TransportError::timeout(failure.to_string(), config))
            }
            Err(TransportFailure::Network(message)) => {
                return Err(TransportError::network(message, config))
            }
        };

        let response = Response::from_http(raw, config.clone());
        if config.accepts_status(response.status) {
            Ok(response)
        } else {
            Err(TransportError::bad_response(config, response))
        }
    }
}

/// Turn a merged config into wire form.
pub fn prepare(config: &RequestConfig) -> Result<HttpRequest, String> {
    let url = config.full_url().map_err(|e| e.to_string())?;
    let body = match &config.data {
        Some(data) if config.method.allows_body() => {
            Some(data.clone().into_text().map_err(|e| e.to_string())?)
        }
        _ => None,
    };
    Ok(HttpRequest {
        method: config.method,
        url,
        headers: config.headers.clone().into_vec(),
        body,
        timeout: config.timeout,
    })
}
