//! Request descriptors and config merging.
//!
//! # Design
//! `RequestConfig` plays two roles: the per-call descriptor and the instance
//! defaults held by `HttpClient`. `RequestConfig::merge` overlays a per-call
//! config onto the defaults; headers merge key by key, every other field is
//! taken from the call when set and from the defaults otherwise.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::http::{Headers, HttpMethod};

/// Query parameters in insertion order. Entries with no value are kept in
/// the descriptor but never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, Option<String>)>);

impl QueryParams {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), Some(value.to_string())));
    }

    pub fn push_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) {
        self.0.push((key.into(), value.map(|v| v.to_string())));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Entries that will be serialized, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Form-urlencoded query string without the leading `?`.
    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        let pairs: Vec<(&str, &str)> = self.present().collect();
        serde_urlencoded::to_string(pairs)
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, Option<V>)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.push_opt(key, value);
        }
        params
    }
}

/// Request payload. Text is sent verbatim, JSON is serialized on dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Json(Value),
}

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(RequestBody::Json)
    }

    pub fn into_text(self) -> Result<String, serde_json::Error> {
        match self {
            RequestBody::Text(text) => Ok(text),
            RequestBody::Json(value) => serde_json::to_string(&value),
        }
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

/// Decides which response statuses count as success.
#[derive(Clone)]
pub struct StatusPredicate(Arc<dyn Fn(u16) -> bool + Send + Sync>);

impl StatusPredicate {
    pub fn new(predicate: impl Fn(u16) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    pub fn accepts(&self, status: u16) -> bool {
        (self.0)(status)
    }
}

impl Default for StatusPredicate {
    fn default() -> Self {
        Self::new(|status| (200..300).contains(&status))
    }
}

impl fmt::Debug for StatusPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StatusPredicate(..)")
    }
}

/// Description of one request, or of the defaults of an `HttpClient`.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub method: HttpMethod,
    pub url: Option<String>,
    pub base_url: Option<String>,
    pub headers: Headers,
    pub params: QueryParams,
    pub data: Option<RequestBody>,
    pub timeout: Option<Duration>,
    pub validate_status: Option<StatusPredicate>,
}

impl RequestConfig {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn post(url: impl Into<String>, data: RequestBody) -> Self {
        Self::new(HttpMethod::Post, url).with_data(data)
    }

    pub fn put(url: impl Into<String>, data: RequestBody) -> Self {
        Self::new(HttpMethod::Put, url).with_data(data)
    }

    pub fn with_data(mut self, data: RequestBody) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_validate_status(mut self, predicate: StatusPredicate) -> Self {
        self.validate_status = Some(predicate);
        self
    }

    /// Overlay `call` onto `defaults`.
    ///
    /// Effective headers start from `Content-Type: application/json`, then
    /// the default headers, then the per-call headers.
    pub fn merge(defaults: &RequestConfig, call: RequestConfig) -> RequestConfig {
        let mut headers: Headers = [("Content-Type", "application/json")].into_iter().collect();
        headers.overlay(&defaults.headers);
        headers.overlay(&call.headers);

        RequestConfig {
            method: call.method,
            url: call.url.or_else(|| defaults.url.clone()),
            base_url: call.base_url.or_else(|| defaults.base_url.clone()),
            headers,
            params: if call.params.is_empty() {
                defaults.params.clone()
            } else {
                call.params
            },
            data: call.data.or_else(|| defaults.data.clone()),
            timeout: call.timeout.or(defaults.timeout),
            validate_status: call
                .validate_status
                .or_else(|| defaults.validate_status.clone()),
        }
    }

    /// `base_url + url` plus the serialized query string.
    pub fn full_url(&self) -> Result<String, serde_urlencoded::ser::Error> {
        let base = self.base_url.as_deref().unwrap_or("");
        let path = self.url.as_deref().unwrap_or("");
        let url = format!("{base}{path}");

        let query = self.params.to_query_string()?;
        if query.is_empty() {
            Ok(url)
        } else {
            Ok(format!("{url}?{query}"))
        }
    }

    pub fn accepts_status(&self, status: u16) -> bool {
        match &self.validate_status {
            Some(predicate) => predicate.accepts(status),
            None => StatusPredicate::default().accepts(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_string_skips_absent_values_in_insertion_order() {
        let params: QueryParams = [
            ("limit", Some("10")),
            ("skip", None),
            ("sortBy", Some("title")),
            ("order", Some("asc")),
        ]
        .into_iter()
        .collect();
        assert_eq!(params.to_query_string().unwrap(), "limit=10&sortBy=title&order=asc");
    }

    #[test]
    fn query_string_is_form_encoded() {
        let mut params = QueryParams::new();
        params.push("q", "smart phone & case");
        assert_eq!(params.to_query_string().unwrap(), "q=smart+phone+%26+case");
    }

    #[test]
    fn full_url_joins_base_and_path() {
        let mut config = RequestConfig::get("/products");
        config.base_url = Some("https://dummyjson.com".to_string());
        assert_eq!(config.full_url().unwrap(), "https://dummyjson.com/products");

        config.params.push("limit", 5);
        assert_eq!(config.full_url().unwrap(), "https://dummyjson.com/products?limit=5");
    }

    #[test]
    fn full_url_with_only_params_absent_has_no_question_mark() {
        let mut config = RequestConfig::get("/users");
        config.params.push_opt("limit", None::<u32>);
        assert_eq!(config.full_url().unwrap(), "/users");
    }

    #[test]
    fn merge_prefers_call_headers_key_by_key() {
        let defaults = RequestConfig {
            base_url: Some("http://upstream".to_string()),
            headers: [("X-Client", "dashboard"), ("Accept", "application/json")]
                .into_iter()
                .collect(),
            timeout: Some(Duration::from_secs(10)),
            ..RequestConfig::default()
        };
        let call = RequestConfig::get("/users").with_header("accept", "text/plain");

        let merged = RequestConfig::merge(&defaults, call);
        assert_eq!(merged.base_url.as_deref(), Some("http://upstream"));
        assert_eq!(merged.headers.get("Content-Type"), Some("application/json"));
        assert_eq!(merged.headers.get("X-Client"), Some("dashboard"));
        assert_eq!(merged.headers.get("Accept"), Some("text/plain"));
        assert_eq!(merged.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn merge_keeps_call_timeout_and_predicate() {
        let defaults = RequestConfig {
            timeout: Some(Duration::from_secs(10)),
            ..RequestConfig::default()
        };
        let call = RequestConfig::get("/users")
            .with_timeout(Duration::from_millis(50))
            .with_validate_status(StatusPredicate::new(|s| s < 500));

        let merged = RequestConfig::merge(&defaults, call);
        assert_eq!(merged.timeout, Some(Duration::from_millis(50)));
        assert!(merged.accepts_status(404));
        assert!(!merged.accepts_status(503));
    }

    #[test]
    fn default_predicate_accepts_only_2xx() {
        let config = RequestConfig::get("/");
        assert!(config.accepts_status(200));
        assert!(config.accepts_status(299));
        assert!(!config.accepts_status(199));
        assert!(!config.accepts_status(300));
        assert!(!config.accepts_status(404));
    }

    #[test]
    fn text_body_is_sent_verbatim_and_json_is_serialized() {
        assert_eq!(RequestBody::from("raw=1").into_text().unwrap(), "raw=1");
        let json = RequestBody::Json(json!({"title": "Phone"}));
        assert_eq!(json.into_text().unwrap(), r#"{"title":"Phone"}"#);
    }
}
