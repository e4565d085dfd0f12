//! In-memory stand-in for the upstream admin API.
//!
//! Serves `/auth`, `/users` and `/products` with the upstream's envelopes
//! (`{users|products, total, skip, limit}`) and error bodies
//! (`{"message": ...}`). Unlike the public upstream, mutations persist for
//! the lifetime of the process so lifecycle tests can observe them.

pub mod seed;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

const DEFAULT_LIMIT: usize = 30;
const USER_SEARCH_FIELDS: &[&str] = &["firstName", "lastName", "maidenName", "email", "username"];

/// Failure reply in the upstream's shape.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(kind: &str, id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{kind} with id '{id}' not found"))
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

type Reply = Result<Json<Value>, ApiFailure>;

#[derive(Debug, Default)]
struct Db {
    users: Vec<Value>,
    products: Vec<Value>,
    access_tokens: HashMap<String, u64>,
    refresh_tokens: HashMap<String, u64>,
    issued: u64,
}

impl Db {
    fn seeded() -> Self {
        Self {
            users: seed::users(),
            products: seed::products(),
            ..Self::default()
        }
    }

    fn issue(&mut self, user_id: u64) -> (String, String) {
        self.issued += 1;
        let access = format!("tok{}", self.issued);
        let refresh = format!("ref{}", self.issued);
        self.access_tokens.insert(access.clone(), user_id);
        self.refresh_tokens.insert(refresh.clone(), user_id);
        (access, refresh)
    }
}

type Shared = Arc<RwLock<Db>>;

pub fn app() -> Router {
    let db: Shared = Arc::new(RwLock::new(Db::seeded()));
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/refresh", post(refresh))
        .route("/users", get(list_users))
        .route("/users/search", get(search_users))
        .route("/users/filter", get(filter_users))
        .route("/users/add", post(add_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).patch(update_user).delete(delete_user),
        )
        .route("/products", get(list_products))
        .route("/products/search", get(search_products))
        .route("/products/categories", get(categories))
        .route("/products/category-list", get(category_list))
        .route("/products/category/{slug}", get(products_in_category))
        .route("/products/add", post(add_product))
        .route(
            "/products/{id}",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Listing helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    limit: Option<usize>,
    skip: Option<usize>,
    sort_by: Option<String>,
    order: Option<String>,
    q: Option<String>,
    key: Option<String>,
    value: Option<String>,
}

/// Value at a dotted path, e.g. `hair.color`.
fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |value, segment| value.get(segment))
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or_default()
            .total_cmp(&y.as_f64().unwrap_or_default()),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        _ => std::cmp::Ordering::Equal,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn contains_ci(record: &Value, fields: &[&str], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    fields.iter().any(|field| {
        record
            .get(*field)
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    })
}

/// Sort, slice and wrap as `{<key>, total, skip, limit}`.
fn page(mut items: Vec<Value>, params: &ListParams, key: &str) -> Json<Value> {
    if let Some(field) = params.sort_by.as_deref().filter(|f| !f.is_empty()) {
        items.sort_by(|a, b| compare(lookup(a, field), lookup(b, field)));
        if params.order.as_deref() == Some("desc") {
            items.reverse();
        }
    }

    let total = items.len();
    let skip = params.skip.unwrap_or(0);
    let limit = match params.limit {
        Some(0) => total,
        Some(limit) => limit,
        None => DEFAULT_LIMIT,
    };
    let window: Vec<Value> = items.into_iter().skip(skip).take(limit).collect();
    let returned = window.len();

    let mut body = Map::new();
    body.insert(key.to_string(), Value::Array(window));
    body.insert("total".to_string(), json!(total));
    body.insert("skip".to_string(), json!(skip));
    body.insert("limit".to_string(), json!(returned));
    Json(Value::Object(body))
}

fn parse_id(kind: &str, raw: &str) -> Result<u64, ApiFailure> {
    raw.parse().map_err(|_| {
        let kind = kind.to_lowercase();
        ApiFailure::new(StatusCode::BAD_REQUEST, format!("Invalid {kind} id '{raw}'"))
    })
}

fn find(records: &[Value], id: u64) -> Option<usize> {
    records
        .iter()
        .position(|r| r.get("id").and_then(Value::as_u64) == Some(id))
}

fn next_id(records: &[Value]) -> u64 {
    records
        .iter()
        .filter_map(|r| r.get("id").and_then(Value::as_u64))
        .max()
        .unwrap_or(0)
        + 1
}

fn merge(target: &mut Value, changes: Value) {
    if let (Some(target), Value::Object(changes)) = (target.as_object_mut(), changes) {
        for (key, value) in changes {
            if key != "id" {
                target.insert(key, value);
            }
        }
    }
}

fn without_password(mut user: Value) -> Value {
    if let Some(object) = user.as_object_mut() {
        object.remove("password");
    }
    user
}

fn deleted(mut record: Value) -> Value {
    if let Some(object) = record.as_object_mut() {
        object.insert("isDeleted".to_string(), json!(true));
        object.insert("deletedOn".to_string(), json!(chrono::Utc::now().to_rfc3339()));
    }
    record
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshBody {
    refresh_token: Option<String>,
}

fn profile(user: &Value) -> Map<String, Value> {
    ["id", "username", "email", "firstName", "lastName", "gender", "image"]
        .iter()
        .filter_map(|field| user.get(*field).map(|v| (field.to_string(), v.clone())))
        .collect()
}

async fn login(State(db): State<Shared>, Json(input): Json<Credentials>) -> Reply {
    let (Some(username), Some(password)) = (input.username, input.password) else {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "Username and password required",
        ));
    };

    let mut db = db.write().await;
    let user = db
        .users
        .iter()
        .find(|u| {
            u.get("username").and_then(Value::as_str) == Some(username.as_str())
                && u.get("password").and_then(Value::as_str) == Some(password.as_str())
        })
        .cloned()
        .ok_or_else(|| ApiFailure::new(StatusCode::BAD_REQUEST, "Invalid credentials"))?;

    let user_id = user.get("id").and_then(Value::as_u64).unwrap_or_default();
    let (access, refresh) = db.issue(user_id);
    debug!(%username, "issued tokens");

    let mut body = profile(&user);
    body.insert("accessToken".to_string(), json!(access));
    body.insert("refreshToken".to_string(), json!(refresh));
    Ok(Json(Value::Object(body)))
}

async fn me(State(db): State<Shared>, headers: HeaderMap) -> Reply {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Access token required"))?;

    let db = db.read().await;
    let user = db
        .access_tokens
        .get(token)
        .and_then(|id| find(&db.users, *id).map(|i| &db.users[i]))
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid/Expired Token!"))?;
    Ok(Json(without_password(user.clone())))
}

async fn refresh(State(db): State<Shared>, Json(input): Json<RefreshBody>) -> Reply {
    let token = input
        .refresh_token
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Refresh token required"))?;

    let mut db = db.write().await;
    let user_id = db
        .refresh_tokens
        .remove(&token)
        .ok_or_else(|| ApiFailure::new(StatusCode::FORBIDDEN, "Invalid refresh token"))?;
    let (access, refresh) = db.issue(user_id);
    Ok(Json(json!({ "accessToken": access, "refreshToken": refresh })))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn list_users(State(db): State<Shared>, Query(params): Query<ListParams>) -> Json<Value> {
    let db = db.read().await;
    let users = db.users.iter().cloned().map(without_password).collect();
    page(users, &params, "users")
}

async fn search_users(State(db): State<Shared>, Query(params): Query<ListParams>) -> Json<Value> {
    let needle = params.q.clone().unwrap_or_default();
    let db = db.read().await;
    let users = db
        .users
        .iter()
        .filter(|u| contains_ci(u, USER_SEARCH_FIELDS, &needle))
        .cloned()
        .map(without_password)
        .collect();
    page(users, &params, "users")
}

async fn filter_users(State(db): State<Shared>, Query(params): Query<ListParams>) -> Json<Value> {
    let key = params.key.clone().unwrap_or_default();
    let value = params.value.clone().unwrap_or_default();
    let db = db.read().await;
    let users = db
        .users
        .iter()
        .filter(|u| lookup(u, &key).is_some_and(|v| as_text(v) == value))
        .cloned()
        .map(without_password)
        .collect();
    page(users, &params, "users")
}

async fn get_user(State(db): State<Shared>, Path(raw): Path<String>) -> Reply {
    let id = parse_id("User", &raw)?;
    let db = db.read().await;
    let index = find(&db.users, id).ok_or_else(|| ApiFailure::not_found("User", &raw))?;
    Ok(Json(without_password(db.users[index].clone())))
}

async fn add_user(State(db): State<Shared>, Json(input): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut db = db.write().await;
    let mut user = json!({ "id": next_id(&db.users) });
    merge(&mut user, input);
    db.users.push(user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn update_user(
    State(db): State<Shared>,
    Path(raw): Path<String>,
    Json(input): Json<Value>,
) -> Reply {
    let id = parse_id("User", &raw)?;
    let mut db = db.write().await;
    let index = find(&db.users, id).ok_or_else(|| ApiFailure::not_found("User", &raw))?;
    merge(&mut db.users[index], input);
    Ok(Json(without_password(db.users[index].clone())))
}

async fn delete_user(State(db): State<Shared>, Path(raw): Path<String>) -> Reply {
    let id = parse_id("User", &raw)?;
    let mut db = db.write().await;
    let index = find(&db.users, id).ok_or_else(|| ApiFailure::not_found("User", &raw))?;
    let user = db.users.remove(index);
    Ok(Json(deleted(without_password(user))))
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

async fn list_products(State(db): State<Shared>, Query(params): Query<ListParams>) -> Json<Value> {
    let db = db.read().await;
    page(db.products.clone(), &params, "products")
}

async fn search_products(
    State(db): State<Shared>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    let needle = params.q.clone().unwrap_or_default();
    let db = db.read().await;
    let products = db
        .products
        .iter()
        .filter(|p| contains_ci(p, &["title", "description"], &needle))
        .cloned()
        .collect();
    page(products, &params, "products")
}

async fn products_in_category(
    State(db): State<Shared>,
    Path(slug): Path<String>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    let db = db.read().await;
    let products = db
        .products
        .iter()
        .filter(|p| p.get("category").and_then(Value::as_str) == Some(slug.as_str()))
        .cloned()
        .collect();
    page(products, &params, "products")
}

fn slugs(products: &[Value]) -> Vec<String> {
    let mut slugs: Vec<String> = products
        .iter()
        .filter_map(|p| p.get("category").and_then(Value::as_str))
        .map(str::to_string)
        .collect();
    slugs.sort();
    slugs.dedup();
    slugs
}

async fn categories(State(db): State<Shared>) -> Json<Value> {
    let db = db.read().await;
    let detailed: Vec<Value> = slugs(&db.products)
        .into_iter()
        .map(|slug| {
            json!({
                "slug": slug,
                "name": seed::category_name(&slug),
                "url": format!("/products/category/{slug}"),
            })
        })
        .collect();
    Json(Value::Array(detailed))
}

async fn category_list(State(db): State<Shared>) -> Json<Value> {
    let db = db.read().await;
    Json(json!(slugs(&db.products)))
}

async fn get_product(State(db): State<Shared>, Path(raw): Path<String>) -> Reply {
    let id = parse_id("Product", &raw)?;
    let db = db.read().await;
    let index = find(&db.products, id).ok_or_else(|| ApiFailure::not_found("Product", &raw))?;
    Ok(Json(db.products[index].clone()))
}

async fn add_product(
    State(db): State<Shared>,
    Json(input): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut db = db.write().await;
    let mut product = json!({ "id": next_id(&db.products) });
    merge(&mut product, input);
    db.products.push(product.clone());
    (StatusCode::CREATED, Json(product))
}

async fn update_product(
    State(db): State<Shared>,
    Path(raw): Path<String>,
    Json(input): Json<Value>,
) -> Reply {
    let id = parse_id("Product", &raw)?;
    let mut db = db.write().await;
    let index = find(&db.products, id).ok_or_else(|| ApiFailure::not_found("Product", &raw))?;
    merge(&mut db.products[index], input);
    Ok(Json(db.products[index].clone()))
}

async fn delete_product(State(db): State<Shared>, Path(raw): Path<String>) -> Reply {
    let id = parse_id("Product", &raw)?;
    let mut db = db.write().await;
    let index = find(&db.products, id).ok_or_else(|| ApiFailure::not_found("Product", &raw))?;
    let product = db.products.remove(index);
    Ok(Json(deleted(product)))
}
