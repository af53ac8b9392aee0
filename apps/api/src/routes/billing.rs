use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::{Plan, User};
use crate::state::AppState;
use crate::store::Session;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub plan: Plan,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub account_id: String,
}

/// POST /api/v1/billing/checkout
pub async fn handle_checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let url = state.billing.create_checkout_session(req.plan).await?;
    Ok(Json(CheckoutResponse { url }))
}

/// POST /api/v1/billing/upgrade
///
/// Demo upgrade: opens a checkout session and treats it as paid.
///
/// The user is looked up again after checkout. Whoever is current once the
/// payment "completes" is upgraded, and nobody is if they signed out meanwhile.
pub async fn handle_upgrade(State(state): State<AppState>) -> Result<Json<User>, AppError> {
    state.auth.require_user(&mut Session::new()).await?;
    state.billing.create_checkout_session(Plan::Pro).await?;
    state
        .auth
        .upgrade_plan(&mut Session::new(), Plan::Pro)
        .await?
        .map(Json)
        .ok_or(AppError::Unauthorized)
}

/// POST /api/v1/billing/connect
pub async fn handle_connect(
    State(state): State<AppState>,
) -> Result<Json<ConnectResponse>, AppError> {
    let account_id = state.billing.connect_account(&mut Session::new()).await?;
    Ok(Json(ConnectResponse { account_id }))
}
