//! Request shape and failure handling checked against a scripted upstream.
//!
//! `wiremock` lets each test pin exactly what the upstream answers and then
//! inspect what the client sent.

use std::sync::Arc;
use std::time::Duration;

use dashboard_core::store::ProductStore;
use dashboard_core::{ApiError, ClientConfig, Dashboard, MemoryStore, ProductQuery, SessionStore};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn product(id: u64, title: &str) -> serde_json::Value {
    json!({"id": id, "title": title, "category": "beauty", "price": 9.99})
}

async fn dashboard(server: &MockServer) -> (Dashboard, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = Dashboard::new(&ClientConfig::new(server.uri()), store.clone());
    (app, store)
}

#[tokio::test]
async fn search_wins_over_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "phone"))
        .and(query_param("limit", "10"))
        .and(query_param("skip", "0"))
        .and(query_param_is_missing("category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [product(6, "iPhone 9")],
            "total": 1, "skip": 0, "limit": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = dashboard(&server).await;
    let query = ProductQuery {
        search: Some("phone".to_string()),
        category: Some("smartphones".to_string()),
        limit: Some(10),
        skip: Some(0),
        ..ProductQuery::default()
    };
    let page = app.products().list(&query).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.products[0].title, "iPhone 9");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0].url.path().contains("category"));
}

#[tokio::test]
async fn stored_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(header("authorization", "Bearer tok9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "firstName": "Emily", "lastName": "Johnson"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, store) = dashboard(&server).await;
    store.set("accessToken", "tok9".to_string());
    let user = app.users().get(1).await.unwrap();
    assert_eq!(user.first_name, "Emily");
}

#[tokio::test]
async fn delete_missing_product_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/products/999"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"message": "Product with id '999' not found"})),
        )
        .mount(&server)
        .await;

    let (app, _) = dashboard(&server).await;
    let err = app.products().delete(999).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Product with id '999' not found");
}

#[tokio::test]
async fn server_error_without_message_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/products/999"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (app, _) = dashboard(&server).await;
    let err = app.products().delete(999).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(!err.is_not_found());
    assert!(matches!(err, ApiError::Http { .. }));
}

#[tokio::test]
async fn unauthorized_clears_stored_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Token Expired!"})),
        )
        .mount(&server)
        .await;

    let (app, store) = dashboard(&server).await;
    store.set("accessToken", "stale".to_string());
    store.set("refreshToken", "stale".to_string());

    let err = app.auth().current_user().await.unwrap_err();
    assert_eq!(err.to_string(), "Token Expired!");
    assert!(store.is_empty());
}

async fn seeded_products(server: &MockServer) -> ProductStore {
    seeded_products_with_session(server).await.0
}

async fn seeded_products_with_session(server: &MockServer) -> (ProductStore, Arc<MemoryStore>) {
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [product(1, "One"), product(2, "Two"), product(3, "Three")],
            "total": 3, "skip": 0, "limit": 10
        })))
        .mount(server)
        .await;

    let (app, session) = dashboard(server).await;
    let store = app.product_store();
    store.fetch_products().await.unwrap();
    (store, session)
}

fn deleted(id: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": id, "isDeleted": true, "deletedOn": "2026-10-17T09:00:00Z"
    }))
}

#[tokio::test]
async fn bulk_delete_is_all_or_nothing() {
    let server = MockServer::start().await;
    let store = seeded_products(&server).await;

    for id in [1, 3] {
        Mock::given(method("DELETE"))
            .and(path(format!("/products/{id}")))
            .respond_with(deleted(id))
            .mount(&server)
            .await;
    }
    Mock::given(method("DELETE"))
        .and(path("/products/2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    store.select_all();
    let err = store.delete_many(&[1, 2, 3]).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "boom");

    let state = store.snapshot();
    assert!(!state.in_flight.is_deleting);
    let ids: Vec<u64> = state.products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(state.selected.len(), 3);
}

#[tokio::test]
async fn bulk_delete_success_clears_selection() {
    let server = MockServer::start().await;
    let store = seeded_products(&server).await;

    for id in [1, 2] {
        Mock::given(method("DELETE"))
            .and(path(format!("/products/{id}")))
            .respond_with(deleted(id))
            .expect(1)
            .mount(&server)
            .await;
    }

    store.select(1);
    store.select(2);
    store.delete_many(&[1, 2]).await.unwrap();

    let state = store.snapshot();
    let ids: Vec<u64> = state.products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3]);
    assert!(state.selected.is_empty());
}

#[tokio::test]
async fn bulk_delete_lets_slow_siblings_finish() {
    let server = MockServer::start().await;
    let (store, session) = seeded_products_with_session(&server).await;
    session.set("accessToken", "tok1".to_string());
    session.set("refreshToken", "ref1".to_string());

    Mock::given(method("DELETE"))
        .and(path("/products/2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/products/1"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"message": "Token Expired!"}))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = store.delete_many(&[1, 2]).await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    // The delayed 401 still went through the response chain.
    assert!(session.is_empty());
    let ids: Vec<u64> = store.snapshot().products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}
