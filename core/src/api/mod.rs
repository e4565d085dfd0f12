//! Typed clients for the upstream admin API.
//!
//! # Design
//! Each operation is split in two: an associated `*_request` function that
//! builds the `RequestConfig` (pure, no I/O) and an async method that sends
//! it through the shared `HttpClient` and decodes the body. Routing rules
//! therefore live in the builders and are tested without a server.
//!
//! All failures come back as `ApiError`. Transport failures are rewrapped
//! with a human-readable message; none are swallowed.

pub mod auth;
pub mod products;
pub mod users;

use serde::de::DeserializeOwned;
use tracing::error;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::request::{QueryParams, RequestBody, RequestConfig};
use crate::types::Pagination;

pub use auth::AuthApi;
pub use products::ProductsApi;
pub use users::UsersApi;

/// Send `config` and decode the body as `T`. `context` names the operation
/// in the failure log.
pub(crate) async fn call<T: DeserializeOwned>(
    http: &HttpClient,
    context: &str,
    config: RequestConfig,
) -> Result<T, ApiError> {
    let response = http.request(config).await.map_err(|err| {
        let err = ApiError::from(err);
        error!(operation = context, %err, "upstream call failed");
        err
    })?;
    response.data.decode().map_err(|err| {
        error!(operation = context, %err, "unexpected response body");
        ApiError::from(err)
    })
}

/// JSON body from a serializable payload.
pub(crate) fn json_body<T: serde::Serialize>(payload: &T) -> Result<RequestBody, ApiError> {
    RequestBody::json(payload).map_err(|err| ApiError::Request(err.to_string()))
}

/// Trimmed, non-blank text or `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn push_page(params: &mut QueryParams, page: Pagination) {
    params.push_opt("limit", page.limit);
    params.push_opt("skip", page.skip);
}
