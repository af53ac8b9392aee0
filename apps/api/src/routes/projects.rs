//! Axum route handlers for saved projects and their deployment.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::{export_file_name, CodeBundle, Project, ProjectDraft, ProjectPatch};
use crate::services::deployment::{ensure_deploy_allowed, find_owned, publish, PublishTarget};
use crate::state::AppState;
use crate::store::Session;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveProjectRequest {
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub code: CodeBundle,
}

/// Either a saved project id or an unsaved draft.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub project_id: Option<Uuid>,
    pub draft: Option<SaveProjectRequest>,
}

#[derive(Debug, Serialize)]
pub struct DeployResponse {
    pub url: String,
}

impl SaveProjectRequest {
    fn into_draft(self, user_id: Uuid) -> ProjectDraft {
        ProjectDraft {
            user_id,
            title: self.title,
            description: self.description,
            prompt: self.prompt,
            code: self.code,
        }
    }
}

async fn find_project(state: &AppState, id: Uuid) -> Result<Project, AppError> {
    state
        .repo
        .get_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/projects
///
/// The current user's projects in the order they were saved.
pub async fn handle_list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, AppError> {
    let user = state.auth.require_user(&mut Session::new()).await?;
    Ok(Json(state.repo.projects_by_user(user.id).await?))
}

/// POST /api/v1/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(req): Json<SaveProjectRequest>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let user = state.auth.require_user(&mut Session::new()).await?;
    let project = state.repo.save_project(req.into_draft(user.id)).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    Ok(Json(find_project(&state, id).await?))
}

/// PATCH /api/v1/projects/:id
///
/// Content fields only; deployment state changes go through the deploy routes.
pub async fn handle_update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProjectPatch>,
) -> Result<Json<Project>, AppError> {
    state.auth.require_user(&mut Session::new()).await?;
    Ok(Json(state.repo.update_project(id, patch).await?))
}

/// DELETE /api/v1/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.auth.require_user(&mut Session::new()).await?;
    if state.repo.delete_project(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Project {id} not found")))
    }
}

/// GET /api/v1/projects/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let project = find_project(&state, id).await?;
    Ok(Html(project.code.preview_document()))
}

/// GET /api/v1/projects/:id/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = find_project(&state, id).await?;
    let body = project.code.export_text(&project.title, &project.description);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(&project.title)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// POST /api/v1/projects/:id/deploy
///
/// Only the owner may deploy. Applies the free-plan limit before handing off
/// to the deployment service.
pub async fn handle_deploy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeployResponse>, AppError> {
    let user = state.auth.require_user(&mut Session::new()).await?;
    let owned = state.repo.projects_by_user(user.id).await?;
    find_owned(&owned, id)?;
    ensure_deploy_allowed(&user, &owned, Some(id))?;
    let url = state.deployments.deploy(id).await?;
    Ok(Json(DeployResponse { url }))
}

/// DELETE /api/v1/projects/:id/deploy
pub async fn handle_undeploy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let user = state.auth.require_user(&mut Session::new()).await?;
    find_owned(&state.repo.projects_by_user(user.id).await?, id)?;
    state.deployments.undeploy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/publish
///
/// Editor "Deploy" button: deploys the saved project, or saves the draft
/// first when the editor has not saved yet.
pub async fn handle_publish(
    State(state): State<AppState>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<Project>, AppError> {
    let user = state.auth.require_user(&mut Session::new()).await?;
    let target = match (req.project_id, req.draft) {
        (Some(id), _) => PublishTarget::Saved(id),
        (None, Some(draft)) => PublishTarget::Draft(draft.into_draft(user.id)),
        (None, None) => {
            return Err(AppError::Validation(
                "either projectId or draft is required".to_string(),
            ))
        }
    };
    let project = publish(&state.repo, &state.deployments, &user, target).await?;
    Ok(Json(project))
}
