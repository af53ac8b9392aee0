use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::GeneratedApp;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Single-use key for `GET /api/v1/handoff/:token`.
    pub token: Uuid,
    pub app: GeneratedApp,
}

/// POST /api/v1/generate
///
/// Resolves the prompt to a template and parks the result in the handoff
/// cache for the editor.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    if req.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    let generated = state.generator.generate(&req.prompt).await?;
    let app = generated.into_app(req.prompt);
    let token = state.handoff.put(app.clone()).await;

    Ok(Json(GenerateResponse { token, app }))
}

/// GET /api/v1/handoff/:token
///
/// Consumes the payload. A second read is a 404, and so is a token that
/// never shows up within the grace period.
pub async fn handle_take_handoff(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<Json<GeneratedApp>, AppError> {
    state
        .handoff
        .take(token)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No generated app for this token".to_string()))
}
