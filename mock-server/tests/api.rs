use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::ServiceExt;

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

// --- auth ---

#[tokio::test]
async fn login_issues_first_token_pair() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({"username": "emilys", "password": "emilyspass", "expiresInMins": 30}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["accessToken"], "tok1");
    assert_eq!(body["refreshToken"], "ref1");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_is_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({"username": "emilys", "password": "nope"}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({"message": "Invalid credentials"}));
}

#[tokio::test]
async fn me_requires_a_known_token() {
    let app = app();
    let resp = app.clone().oneshot(get("/auth/me")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/auth/me")
        .header(http::header::AUTHORIZATION, "Bearer forged")
        .body(String::new())
        .unwrap();
    let resp = app.oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["message"], "Invalid/Expired Token!");
}

#[tokio::test]
async fn refresh_rotates_tokens_once() {
    let app = app();
    app.clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({"username": "emilys", "password": "emilyspass"}),
        ))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(json_request("POST", "/auth/refresh", json!({"refreshToken": "ref1"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({"accessToken": "tok2", "refreshToken": "ref2"})
    );

    let resp = app
        .oneshot(json_request("POST", "/auth/refresh", json!({"refreshToken": "ref1"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- users ---

#[tokio::test]
async fn list_users_pages_and_sorts() {
    let resp = app()
        .oneshot(get("/users?limit=2&skip=1&sortBy=age&order=desc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["total"], 5);
    assert_eq!(body["skip"], 1);
    assert_eq!(body["limit"], 2);
    let ages: Vec<u64> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["age"].as_u64().unwrap())
        .collect();
    assert_eq!(ages, vec![42, 35]);
}

#[tokio::test]
async fn search_and_filter_users() {
    let app = app();
    let body = body_json(app.clone().oneshot(get("/users/search?q=john")).await.unwrap()).await;
    assert_eq!(body["total"], 2);

    let body = body_json(
        app.oneshot(get("/users/filter?key=hair.color&value=Brown"))
            .await
            .unwrap(),
    )
    .await;
    let ids: Vec<u64> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 4]);
}

#[tokio::test]
async fn unknown_user_is_404_with_message() {
    let resp = app().oneshot(get("/users/999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await,
        json!({"message": "User with id '999' not found"})
    );
}

#[tokio::test]
async fn user_update_and_delete_persist() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/users/2", json!({"lastName": "Owais"})))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["lastName"], "Owais");

    let resp = app.clone().oneshot(json_request("DELETE", "/users/2", json!({}))).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["isDeleted"], true);
    assert!(body["deletedOn"].is_string());

    let resp = app.oneshot(get("/users/2")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- products ---

#[tokio::test]
async fn search_products_matches_title() {
    let body = body_json(app().oneshot(get("/products/search?q=phone")).await.unwrap()).await;
    let titles: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["iPhone 9", "Samsung Universe 9 phone"]);
}

#[tokio::test]
async fn category_routes() {
    let app = app();
    let body = body_json(
        app.clone()
            .oneshot(get("/products/category/mens-shirts"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["total"], 2);

    let slugs = body_json(app.clone().oneshot(get("/products/category-list")).await.unwrap()).await;
    assert_eq!(slugs[0], "beauty");

    let detailed = body_json(app.oneshot(get("/products/categories")).await.unwrap()).await;
    assert_eq!(
        detailed[4],
        json!({"slug": "mens-shirts", "name": "Mens Shirts", "url": "/products/category/mens-shirts"})
    );
}

#[tokio::test]
async fn add_product_returns_201_with_new_id() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/products/add",
            json!({"title": "BMW Pencil", "price": 2.5}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["id"], 10);
    assert_eq!(body["title"], "BMW Pencil");
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let resp = app().oneshot(get("/products/abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "Invalid product id 'abc'");
}
