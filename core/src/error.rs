//! Error types for the HTTP pipeline and the domain clients.
//!
//! # Design
//! Two layers. `TransportError` is what `HttpClient` and the interceptors see:
//! it keeps the originating `RequestConfig` and, when the server replied, the
//! full `Response`. `ApiError` is what domain clients and stores return: a
//! closed set of failure kinds whose `Display` is the human-readable message
//! shown to users. `From<TransportError> for ApiError` performs the rewrap.

use serde_json::Value;
use thiserror::Error;

use crate::request::RequestConfig;
use crate::response::Response;

/// Advisory message used when the request went out but nothing came back.
pub const NO_RESPONSE_MESSAGE: &str =
    "No response from server. Please check your internet connection.";

/// Machine-readable classification of a `TransportError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorCode {
    /// The server replied with a status the acceptance predicate rejected.
    BadResponse,
    /// Connection-level failure, no reply.
    Network,
    /// The configured timeout elapsed before a reply.
    Timeout,
    /// A request interceptor refused the request.
    Interceptor,
    /// The request body could not be serialized or the URL could not be built.
    Serialization,
}

impl TransportErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportErrorCode::BadResponse => "ERR_BAD_RESPONSE",
            TransportErrorCode::Network => "ERR_NETWORK",
            TransportErrorCode::Timeout => "ECONNABORTED",
            TransportErrorCode::Interceptor => "ERR_INTERCEPTOR",
            TransportErrorCode::Serialization => "ERR_SERIALIZATION",
        }
    }

    /// True for the codes where the request was dispatched but no reply arrived.
    pub fn is_no_response(self) -> bool {
        matches!(self, TransportErrorCode::Network | TransportErrorCode::Timeout)
    }
}

/// Failure of one pipeline call.
///
/// `response` is `Some` only when the server replied, and then its status is
/// outside the acceptance predicate.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub code: Option<TransportErrorCode>,
    pub config: Option<Box<RequestConfig>>,
    pub response: Option<Box<Response>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>, code: TransportErrorCode) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
            config: None,
            response: None,
        }
    }

    pub fn bad_response(config: RequestConfig, response: Response) -> Self {
        Self {
            message: format!("Request failed with status code {}", response.status),
            code: Some(TransportErrorCode::BadResponse),
            config: Some(Box::new(config)),
            response: Some(Box::new(response)),
        }
    }

    pub fn network(message: impl Into<String>, config: RequestConfig) -> Self {
        Self::new(message, TransportErrorCode::Network).with_config(config)
    }

    pub fn timeout(message: impl Into<String>, config: RequestConfig) -> Self {
        Self::new(message, TransportErrorCode::Timeout).with_config(config)
    }

    pub fn interceptor(message: impl Into<String>) -> Self {
        Self::new(message, TransportErrorCode::Interceptor)
    }

    pub fn serialization(message: impl Into<String>, config: RequestConfig) -> Self {
        Self::new(message, TransportErrorCode::Serialization).with_config(config)
    }

    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = Some(Box::new(config));
        self
    }

    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }
}

/// Human-readable message for a pipeline failure.
///
/// Prefers the upstream `message` field, then `HTTP {status}: {status text}`,
/// then the no-response advisory, then the error's own message.
pub fn error_message(error: &TransportError) -> String {
    if let Some(response) = &error.response {
        if let Some(message) = response.data.message() {
            return message.to_string();
        }
        return format!("HTTP {}: {}", response.status, response.status_text);
    }
    if error.code.is_some_and(TransportErrorCode::is_no_response) {
        return NO_RESPONSE_MESSAGE.to_string();
    }
    error.message.clone()
}

/// Failure returned by domain clients, services and stores.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("{message}")]
    Network { message: String },

    /// The upstream replied with a rejected status.
    #[error("{message}")]
    Http {
        status: u16,
        status_text: String,
        message: String,
        body: Option<Value>,
    },

    /// Client-side validation failed before any request was made.
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// The request could not be prepared or an interceptor refused it.
    #[error("{0}")]
    Request(String),

    /// The response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Session precondition failed, e.g. no refresh token stored.
    #[error("{0}")]
    Session(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        let message = error_message(&error);
        if let Some(response) = error.response {
            return ApiError::Http {
                status: response.status,
                status_text: response.status_text,
                message,
                body: response.data.as_json().cloned(),
            };
        }
        match error.code {
            Some(code) if code.is_no_response() => ApiError::Network { message },
            _ => ApiError::Request(message),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}
