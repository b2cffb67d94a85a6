use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::issue_token;
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation("username and password are required".into()));
    }

    if db::get_admin_by_username(state.pool.as_ref(), username)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation(
            "Admin with this username already exists".into(),
        ));
    }

    let password_hash = bcrypt::hash(&body.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;

    db::insert_admin(state.pool.as_ref(), username, &password_hash).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Admin registered successfully" })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // one rejection message for both unknown user and bad password, so the
    // response never reveals whether the username exists
    let invalid = || ApiError::Unauthorized("Invalid credentials".into());

    let admin = db::get_admin_by_username(state.pool.as_ref(), body.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let matches = bcrypt::verify(&body.password, &admin.password_hash)
        .map_err(|e| ApiError::Internal(format!("password verification failed: {e}")))?;
    if !matches {
        return Err(invalid());
    }

    let token = issue_token(admin.id, &state.config.jwt_secret)
        .map_err(|e| ApiError::Internal(format!("token issuance failed: {e}")))?;

    Ok(Json(serde_json::json!({
        "message": "Login successful",
        "token": token,
    })))
}
