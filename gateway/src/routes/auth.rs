use axum::{extract::State, Json};
use dashboard_core::{LoginRequest, LoginResponse};
use tracing::{info, warn};

use crate::{AppState, GatewayError};

/// Authenticate against the upstream. Any upstream failure reads as bad
/// credentials.
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, GatewayError> {
    match state.auth.login(&credentials).await {
        Ok(login) => {
            info!(user = %login.user.username, "login forwarded");
            Ok(Json(login))
        }
        Err(err) => {
            warn!(%err, username = %credentials.username, "login rejected");
            Err(GatewayError::Unauthenticated("Invalid credentials".to_string()))
        }
    }
}
