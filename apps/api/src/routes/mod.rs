pub mod auth;
pub mod billing;
pub mod generate;
pub mod health;
pub mod projects;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/sign-up", post(auth::handle_sign_up))
        .route("/api/v1/auth/sign-in", post(auth::handle_sign_in))
        .route("/api/v1/auth/sign-out", post(auth::handle_sign_out))
        .route("/api/v1/auth/me", get(auth::handle_me))
        .route("/api/v1/auth/plan", post(auth::handle_update_plan))
        // Generation + editor handoff
        .route("/api/v1/generate", post(generate::handle_generate))
        .route(
            "/api/v1/handoff/:token",
            get(generate::handle_take_handoff),
        )
        // Projects
        .route(
            "/api/v1/projects",
            get(projects::handle_list_projects).post(projects::handle_create_project),
        )
        .route(
            "/api/v1/projects/:id",
            get(projects::handle_get_project)
                .patch(projects::handle_update_project)
                .delete(projects::handle_delete_project),
        )
        .route("/api/v1/projects/:id/preview", get(projects::handle_preview))
        .route("/api/v1/projects/:id/export", get(projects::handle_export))
        .route(
            "/api/v1/projects/:id/deploy",
            post(projects::handle_deploy).delete(projects::handle_undeploy),
        )
        .route("/api/v1/publish", post(projects::handle_publish))
        // Billing
        .route("/api/v1/billing/checkout", post(billing::handle_checkout))
        .route("/api/v1/billing/upgrade", post(billing::handle_upgrade))
        .route("/api/v1/billing/connect", post(billing::handle_connect))
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
