use axum::body::Body;
use axum::extract::{Host, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::AdminAuth;
use crate::db::{self, Certificate};
use crate::error::ApiError;
use crate::pdf::assets::Assets;
use crate::pdf::render_certificate;
use crate::state::AppState;

/// Identifier generation collisions are store-level constraint violations;
/// the create path is the one place a bounded retry with a fresh id is
/// worth it.
const CREATE_ATTEMPTS: u32 = 3;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCertificateRequest {
    #[serde(default)]
    candidate_name: String,
    #[serde(default)]
    course_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCertificateRequest {
    candidate_name: Option<String>,
    course_name: Option<String>,
}

pub async fn create_certificate(
    State(state): State<Arc<AppState>>,
    AdminAuth(_claims): AdminAuth,
    Json(body): Json<CreateCertificateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    for attempt in 1..=CREATE_ATTEMPTS {
        match db::create_certificate(state.pool.as_ref(), &body.candidate_name, &body.course_name)
            .await
        {
            Ok(certificate) => return Ok((StatusCode::CREATED, Json(certificate))),
            Err(ApiError::Duplicate) if attempt < CREATE_ATTEMPTS => {
                tracing::warn!("learning id collision on attempt {attempt}, regenerating");
            }
            Err(err) => return Err(err),
        }
    }
    Err(ApiError::Duplicate)
}

pub async fn get_certificate(
    State(state): State<Arc<AppState>>,
    Path(learning_id): Path<String>,
) -> Result<Json<Certificate>, ApiError> {
    db::get_certificate_by_learning_id(state.pool.as_ref(), &learning_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn list_certificates(
    State(state): State<Arc<AppState>>,
    AdminAuth(_claims): AdminAuth,
) -> Result<Json<Vec<Certificate>>, ApiError> {
    let certificates = db::list_certificates(state.pool.as_ref()).await?;
    Ok(Json(certificates))
}

pub async fn update_certificate(
    State(state): State<Arc<AppState>>,
    AdminAuth(_claims): AdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<UpdateCertificateRequest>,
) -> Result<Json<Certificate>, ApiError> {
    db::update_certificate(
        state.pool.as_ref(),
        id,
        body.candidate_name.as_deref(),
        body.course_name.as_deref(),
    )
    .await?
    .map(Json)
    .ok_or(ApiError::NotFound)
}

pub async fn delete_certificate(
    State(state): State<Arc<AppState>>,
    AdminAuth(_claims): AdminAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    if db::delete_certificate(state.pool.as_ref(), id).await? {
        Ok(Json(serde_json::json!({
            "message": "Certificate deleted successfully"
        })))
    } else {
        Err(ApiError::NotFound)
    }
}

pub async fn download_certificate_pdf(
    State(state): State<Arc<AppState>>,
    Host(host): Host,
    Path(learning_id): Path<String>,
) -> Result<Response, ApiError> {
    let certificate = db::get_certificate_by_learning_id(state.pool.as_ref(), &learning_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let base_url = format!("{}://{}", state.config.public_scheme, host);
    let assets = Assets::load(&state.config.assets_dir);

    let bytes = render_certificate(&certificate, &base_url, &assets)?;

    tracing::info!(
        learning_id = %certificate.learning_id,
        size = bytes.len(),
        "rendered certificate document"
    );

    Ok(Response::builder()
        .header("Content-Type", "application/pdf")
        .header(
            "Content-Disposition",
            format!("attachment; filename={}.pdf", certificate.learning_id),
        )
        .body(Body::from(bytes))
        .unwrap()
        .into_response())
}
