use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use dashboard_core::{Category, Deleted, Product, ProductDraft, ProductPage, ProductQuery};
use serde::Serialize;

use crate::{AppState, GatewayError};

const NOT_FOUND: &str = "Product not found";

#[derive(Debug, Serialize)]
pub struct Categories {
    pub categories: Vec<Category>,
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<ProductPage>, GatewayError> {
    let Query(query) = query?;
    state
        .products
        .list(&query)
        .await
        .map(Json)
        .map_err(|err| GatewayError::failed(err, "Failed to fetch products"))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Product>, GatewayError> {
    state
        .products
        .get(id)
        .await
        .map(Json)
        .map_err(|err| GatewayError::lookup(err, NOT_FOUND, "Failed to fetch product"))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), GatewayError> {
    let product = state
        .products
        .create(&draft)
        .await
        .map_err(|err| GatewayError::failed(err, "Failed to create product"))?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>, GatewayError> {
    state
        .products
        .update(id, &draft)
        .await
        .map(Json)
        .map_err(|err| GatewayError::lookup(err, NOT_FOUND, "Failed to update product"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Deleted>, GatewayError> {
    state
        .products
        .delete(id)
        .await
        .map(Json)
        .map_err(|err| GatewayError::lookup(err, NOT_FOUND, "Failed to delete product"))
}

pub async fn categories(State(state): State<AppState>) -> Result<Json<Categories>, GatewayError> {
    let categories = state
        .products
        .categories()
        .await
        .map_err(|err| GatewayError::failed(err, "Failed to fetch categories"))?;
    Ok(Json(Categories { categories }))
}
