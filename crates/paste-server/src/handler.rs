use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use paste_core::PasteService;
use paste_types::Credential;

use crate::error::ServerResult;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PasteService>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTextRequest {
    pub name: String,
    pub msg: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTextResponse {
    /// The credential. Shown once; only its hash is kept.
    #[serde(rename = "your url")]
    pub your_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReadTextRequest {
    pub name: String,
    pub url: String,
}

/// Health check response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `POST /create_text`
pub async fn create_text(
    State(state): State<AppState>,
    payload: Result<Json<CreateTextRequest>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<CreateTextResponse>)> {
    let Json(req) = payload?;
    let credential = state.service.create(&req.name, &req.msg).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateTextResponse {
            your_url: credential.into_inner(),
        }),
    ))
}

/// `POST /read/`
pub async fn read_text(
    State(state): State<AppState>,
    payload: Result<Json<ReadTextRequest>, JsonRejection>,
) -> ServerResult<Json<String>> {
    let Json(req) = payload?;
    let text = state
        .service
        .read(&req.name, &Credential::new(req.url))
        .await?;
    Ok(Json(text))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, label) = match state.service.health().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };
    (
        status,
        Json(HealthResponse {
            status: label.into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }),
    )
}
