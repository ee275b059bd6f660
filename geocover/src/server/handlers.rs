//! Route handlers.
//!
//! Request fields are parsed up front; the covering work then runs on the
//! blocking thread pool.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::Json;
use serde::Serialize;

use super::{AppState, ServerError};
use crate::query::{
    check_intersection, cover_geojson, cover_hex_geojson, decode_geojson, CoverParams,
    CoverResponse, FormFields, HexParams, HexResponse, IntersectParams, IntersectResponse,
};

type FormBody = Result<Form<FormFields>, FormRejection>;

fn fields(body: FormBody) -> Result<FormFields, ServerError> {
    body.map(|Form(fields)| fields)
        .map_err(|e| ServerError::BadRequest(e.body_text()))
}

async fn run_blocking<T, F>(work: F) -> Result<T, ServerError>
where
    F: FnOnce() -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}

/// `POST /cover`
pub async fn cover(
    State(state): State<Arc<AppState>>,
    body: FormBody,
) -> Result<Json<CoverResponse>, ServerError> {
    let params = CoverParams::from_form(&fields(body)?)?;
    let engine = state.engine;
    let response = run_blocking(move || {
        let features = decode_geojson(&params.geojson)?;
        cover_geojson(&features, &params, &engine)
    })
    .await?;
    Ok(Json(response))
}

/// `POST /cover/h3`
pub async fn cover_hex(
    State(state): State<Arc<AppState>>,
    body: FormBody,
) -> Result<Json<HexResponse>, ServerError> {
    let params = HexParams::from_form(&fields(body)?)?;
    let engine = state.engine;
    let response = run_blocking(move || {
        let features = decode_geojson(&params.geojson)?;
        cover_hex_geojson(&features, params.resolution, &engine)
    })
    .await?;
    Ok(Json(response))
}

/// `POST /intersects`
pub async fn intersects(
    State(state): State<Arc<AppState>>,
    body: FormBody,
) -> Result<Json<IntersectResponse>, ServerError> {
    let params = IntersectParams::from_form(&fields(body)?)?;
    let engine = state.engine;
    let response = run_blocking(move || {
        let features = decode_geojson(&params.geojson)?;
        check_intersection(&features, &params, &engine)
    })
    .await?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    tracing::debug!("health check requested");
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}
