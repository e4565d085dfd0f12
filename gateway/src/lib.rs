//! Passthrough endpoints in front of the upstream admin API.
//!
//! # Design
//! Each route maps one-to-one onto a `dashboard-core` domain client call and
//! reshapes only the failure: an upstream 404 on a single entity becomes a
//! typed `NOT_FOUND`, anything else a generic `INTERNAL` with a fixed
//! message. The gateway holds no session; the upstream sees every call as
//! anonymous.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use dashboard_core::{AuthApi, ClientConfig, HttpClient, ProductsApi, TrafficLogger, UsersApi};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info_span;
use uuid::Uuid;

pub use config::{GatewayConfig, GatewayConfigError};
pub use error::GatewayError;

/// Domain clients shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthApi,
    pub users: UsersApi,
    pub products: ProductsApi,
}

impl AppState {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            auth: AuthApi::new(http.clone()),
            users: UsersApi::new(http.clone()),
            products: ProductsApi::new(http),
        }
    }

    /// Client over `reqwest` with traffic logging on both chains.
    pub fn from_config(config: &ClientConfig) -> Self {
        let http = Arc::new(HttpClient::from_config(config));
        http.interceptors().request.register(Arc::new(TrafficLogger));
        http.interceptors().response.register(Arc::new(TrafficLogger));
        Self::new(http)
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/auth/login", post(routes::auth::login))
        .route(
            "/products",
            get(routes::products::list).post(routes::products::create),
        )
        .route("/products/categories", get(routes::products::categories))
        .route(
            "/products/{id}",
            get(routes::products::get)
                .put(routes::products::update)
                .delete(routes::products::delete),
        )
        .route("/users", get(routes::users::list))
        .route(
            "/users/{id}",
            get(routes::users::get)
                .put(routes::users::update)
                .delete(routes::users::delete),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %request.method(),
                uri = %request.uri(),
            )
        }))
        .layer(CorsLayer::permissive())
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
