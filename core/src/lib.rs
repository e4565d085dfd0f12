//! Client core for the admin dashboard.
//!
//! # Overview
//! An async HTTP pipeline (`HttpClient`) with ordered request/response
//! interceptors, a session context with an explicit lifecycle, typed clients
//! for the upstream `/auth`, `/users` and `/products` endpoints, and
//! observable stores for the listing screens.
//!
//! # Design
//! - The network sits behind the `Transport` trait; everything above it is
//!   plain data and deterministic given a transport.
//! - Domain clients split each operation into a pure `*_request` builder and
//!   an async call, so routing is unit-testable.
//! - The session is an explicit `Arc<Session>` shared by the interceptors and
//!   `AuthService`. A 401 from any call clears it and emits
//!   `SessionEvent::Expired` instead of navigating anywhere itself.
//! - Errors surface as `ApiError`, a closed set of failure kinds whose
//!   display string is the message to show the user.
//! - `Dashboard` wires the standard interceptor set once; tests build it over
//!   a stub transport.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod interceptor;
pub mod request;
pub mod response;
pub mod session;
pub mod store;
pub mod transport;
pub mod types;
pub mod validation;

use std::sync::Arc;

pub use api::{AuthApi, ProductsApi, UsersApi};
pub use client::HttpClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{error_message, ApiError, TransportError, TransportErrorCode};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use interceptor::{AuthHeader, InterceptorId, SessionGuard, TrafficLogger};
pub use request::{QueryParams, RequestBody, RequestConfig, StatusPredicate};
pub use response::{Response, ResponseData};
pub use session::{AuthService, MemoryStore, Session, SessionEvent, SessionState, SessionStore};
pub use store::{ProductStore, UserStore};
pub use transport::{ReqwestTransport, Transport, TransportFailure};
pub use types::{
    AuthUser, Category, Deleted, LoginRequest, LoginResponse, Pagination, Product, ProductDraft,
    ProductPage, ProductQuery, SortOrder, User, UserDraft, UserPage, UserQuery,
};

/// The wired client stack: one `HttpClient`, one `Session`, and the domain
/// clients on top.
///
/// Interceptors are registered in this order: request `TrafficLogger`,
/// `AuthHeader`; response `TrafficLogger`, `SessionGuard`.
#[derive(Clone)]
pub struct Dashboard {
    http: Arc<HttpClient>,
    session: Arc<Session>,
    auth: AuthService,
    users: UsersApi,
    products: ProductsApi,
}

impl Dashboard {
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Self {
        Self::with_transport(config, store, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(
        config: &ClientConfig,
        store: Arc<dyn SessionStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let http = Arc::new(HttpClient::new(config.defaults(), transport));
        let session = Arc::new(Session::new(store));

        let interceptors = http.interceptors();
        interceptors.request.register(Arc::new(TrafficLogger));
        interceptors.request.register(Arc::new(AuthHeader::new(session.clone())));
        interceptors.response.register(Arc::new(TrafficLogger));
        interceptors.response.register(Arc::new(SessionGuard::new(session.clone())));

        Self {
            auth: AuthService::new(AuthApi::new(http.clone()), session.clone()),
            users: UsersApi::new(http.clone()),
            products: ProductsApi::new(http.clone()),
            http,
            session,
        }
    }

    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn users(&self) -> &UsersApi {
        &self.users
    }

    pub fn products(&self) -> &ProductsApi {
        &self.products
    }

    pub fn product_store(&self) -> ProductStore {
        ProductStore::new(self.products.clone())
    }

    pub fn user_store(&self) -> UserStore {
        UserStore::new(self.users.clone())
    }
}
