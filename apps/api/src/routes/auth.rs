use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::user::{Plan, User};
use crate::state::AppState;
use crate::store::Session;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub plan: Plan,
}

/// POST /api/v1/auth/sign-up
pub async fn handle_sign_up(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<User>, AppError> {
    let user = state
        .auth
        .sign_up(&mut Session::new(), &creds.email, &creds.password)
        .await?;
    Ok(Json(user))
}

/// POST /api/v1/auth/sign-in
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<User>, AppError> {
    let user = state
        .auth
        .sign_in(&mut Session::new(), &creds.email, &creds.password)
        .await?;
    Ok(Json(user))
}

/// POST /api/v1/auth/sign-out
pub async fn handle_sign_out(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.auth.sign_out(&mut Session::new()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(State(state): State<AppState>) -> Result<Json<User>, AppError> {
    Ok(Json(state.auth.require_user(&mut Session::new()).await?))
}

/// POST /api/v1/auth/plan
pub async fn handle_update_plan(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<User>, AppError> {
    state
        .auth
        .upgrade_plan(&mut Session::new(), req.plan)
        .await?
        .map(Json)
        .ok_or(AppError::Unauthorized)
}
