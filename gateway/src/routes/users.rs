use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use dashboard_core::{Deleted, User, UserDraft, UserPage, UserQuery};

use crate::{AppState, GatewayError};

const NOT_FOUND: &str = "User not found";

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<UserPage>, GatewayError> {
    let Query(query) = query?;
    state
        .users
        .list(&query)
        .await
        .map(Json)
        .map_err(|err| GatewayError::failed(err, "Failed to fetch users"))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<User>, GatewayError> {
    state
        .users
        .get(id)
        .await
        .map(Json)
        .map_err(|err| GatewayError::lookup(err, NOT_FOUND, "Failed to fetch user"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(draft): Json<UserDraft>,
) -> Result<Json<User>, GatewayError> {
    state
        .users
        .update(id, &draft)
        .await
        .map(Json)
        .map_err(|err| GatewayError::lookup(err, NOT_FOUND, "Failed to update user"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Deleted>, GatewayError> {
    state
        .users
        .delete(id)
        .await
        .map(Json)
        .map_err(|err| GatewayError::lookup(err, NOT_FOUND, "Failed to delete user"))
}
