//! Normalized response envelope.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::{Headers, HttpResponse};
use crate::request::RequestConfig;

/// Parsed response body. JSON content types yield `Json`, anything else (or
/// a JSON body that does not parse) yields `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Json(Value),
    Text(String),
}

impl ResponseData {
    pub fn parse(content_type: Option<&str>, body: String) -> Self {
        let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            return ResponseData::Text(body);
        }
        match serde_json::from_str(&body) {
            Ok(value) => ResponseData::Json(value),
            Err(_) => ResponseData::Text(body),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(value) => Some(value),
            ResponseData::Text(_) => None,
        }
    }

    /// The upstream `message` field, when the body is a JSON object carrying one.
    pub fn message(&self) -> Option<&str> {
        self.as_json()?.get("message")?.as_str()
    }

    /// Decode into `T`. Text bodies are tried as JSON as a last resort.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            ResponseData::Json(value) => serde_json::from_value(value.clone()),
            ResponseData::Text(text) => serde_json::from_str(text),
        }
    }
}

/// The envelope handed to response interceptors and domain clients.
#[derive(Debug, Clone)]
pub struct Response {
    pub data: ResponseData,
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    pub config: RequestConfig,
}

impl Response {
    pub fn from_http(raw: HttpResponse, config: RequestConfig) -> Self {
        let content_type = raw.header("content-type").map(str::to_string);
        let data = ResponseData::parse(content_type.as_deref(), raw.body);
        Self {
            data,
            status: raw.status,
            status_text: raw.status_text,
            headers: raw.headers.into_iter().collect(),
            config,
        }
    }
}
