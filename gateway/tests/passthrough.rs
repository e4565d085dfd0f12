use axum::http::{self, Request, StatusCode};
use axum::Router;
use dashboard_core::ClientConfig;
use dashboard_gateway::{app, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Gateway router in front of a fresh mock upstream.
async fn gateway() -> Router {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    app(AppState::from_config(&ClientConfig::new(format!("http://{addr}"))))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

#[tokio::test]
async fn health() {
    let resp = gateway().await.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn login_forwards_profile_and_tokens() {
    let app = gateway().await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({"username": "emilys", "password": "emilyspass"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["username"], "emilys");
    assert_eq!(body["accessToken"], "tok1");

    let resp = app
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({"username": "emilys", "password": "nope"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp).await,
        json!({"code": "UNAUTHENTICATED", "message": "Invalid credentials"})
    );
}

#[tokio::test]
async fn product_listing_routes_search_first() {
    let resp = gateway()
        .await
        .oneshot(get("/products?search=phone&category=mens-shirts&limit=5"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["products"][0]["title"], "iPhone 9");
}

#[tokio::test]
async fn missing_product_is_typed_not_found() {
    let app = gateway().await;
    for method in ["GET", "DELETE"] {
        let request = Request::builder()
            .method(method)
            .uri("/products/999")
            .body(String::new())
            .unwrap();
        let resp = app.clone().oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method}");
        assert_eq!(
            body_json(resp).await,
            json!({"code": "NOT_FOUND", "message": "Product not found"})
        );
    }

    let resp = app
        .oneshot(json_request("PUT", "/users/999", json!({"lastName": "X"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "User not found");
}

#[tokio::test]
async fn product_create_update_delete() {
    let app = gateway().await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/products",
            json!({"title": "BMW Pencil", "price": 2.5, "category": "stationery"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["id"], 10);

    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/products/10", json!({"price": 3.0})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["price"], 3.0);

    let resp = app
        .oneshot(json_request("DELETE", "/products/10", json!({})))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["id"], 10);
    assert_eq!(body["isDeleted"], true);
}

#[tokio::test]
async fn invalid_product_is_rejected_before_upstream() {
    let resp = gateway()
        .await
        .oneshot(json_request("POST", "/products", json!({"price": -1.0})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await,
        json!({
            "code": "INVALID_ARGUMENT",
            "message": "Title is required, Price must be a positive number"
        })
    );
}

#[tokio::test]
async fn categories_are_wrapped() {
    let resp = gateway()
        .await
        .oneshot(get("/products/categories"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["categories"][0]["slug"], "beauty");
    assert_eq!(body["categories"][0]["name"], "Beauty");
}

#[tokio::test]
async fn users_list_and_get() {
    let app = gateway().await;
    let body = body_json(
        app.clone()
            .oneshot(get("/users?limit=2&sortBy=age&order=desc"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["total"], 5);
    assert_eq!(body["users"][0]["age"], 45);

    let body = body_json(app.oneshot(get("/users/1")).await.unwrap()).await;
    assert_eq!(body["username"], "emilys");
    assert_eq!(body["hair"]["type"], "Curly");
}

#[tokio::test]
async fn listing_order_is_case_insensitive() {
    let app = gateway().await;
    let body = body_json(
        app.clone()
            .oneshot(get("/users?limit=2&sortBy=age&order=DESC"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["users"][0]["age"], 45);

    let resp = app
        .oneshot(get("/products?sortBy=price&order=DESC"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_listing_query_is_invalid_argument() {
    let app = gateway().await;
    for uri in ["/products?order=sideways", "/users?limit=many"] {
        let resp = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = body_json(resp).await;
        assert_eq!(body["code"], "INVALID_ARGUMENT", "{uri}");
        assert!(body["message"].as_str().unwrap().contains("query string"), "{uri}");
    }
}

#[tokio::test]
async fn unreachable_upstream_is_internal() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let router = app(AppState::from_config(&ClientConfig::new(format!("http://{addr}"))));
    let resp = router.oneshot(get("/products/1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp).await,
        json!({"code": "INTERNAL", "message": "Failed to fetch product"})
    );
}
