//! User lookup routes.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use savora_common::error::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/users/check-username", post(check_username))
}

#[derive(Debug, Deserialize)]
pub struct CheckUsernameRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct CheckUsernameResponse {
    pub exists: bool,
}

/// POST /api/users/check-username — does a profile with this display name
/// exist? Requires an authenticated caller.
async fn check_username(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CheckUsernameRequest>,
) -> Result<Json<CheckUsernameResponse>, AppError> {
    if req.username.trim().is_empty() {
        return Err(AppError::Validation("username must not be empty".to_string()));
    }

    tracing::debug!(caller = %auth.user_id, username = %req.username, "Username check");

    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE name = $1)")
            .bind(&req.username)
            .fetch_one(&state.pool)
            .await?;

    Ok(Json(CheckUsernameResponse { exists }))
}
