//! Mock deployment plus the free-plan deploy policy.
//!
//! `deploy` does not check plan limits. Callers run [`ensure_deploy_allowed`]
//! first; [`publish`] bundles that check with save-then-deploy for unsaved
//! editor drafts.

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::{Project, ProjectDraft, ProjectPatch};
use crate::models::user::{Plan, User};
use crate::services::latency::{LatencyPolicy, Operation};
use crate::store::Repository;

pub const DEFAULT_DEPLOY_HOST: &str = "https://app.launchai.dev";

/// Deployed projects a free user may keep at once.
pub const FREE_PLAN_DEPLOY_LIMIT: usize = 1;

pub const DEPLOY_LIMIT_MESSAGE: &str =
    "Free users can only deploy 1 project. Upgrade to Pro for unlimited deployments!";

#[derive(Clone)]
pub struct DeploymentService {
    repo: Repository,
    latency: LatencyPolicy,
    host: String,
}

impl DeploymentService {
    pub fn new(repo: Repository, latency: LatencyPolicy, host: impl Into<String>) -> Self {
        Self {
            repo,
            latency,
            host: host.into(),
        }
    }

    pub fn deployment_url(&self, id: Uuid) -> String {
        format!("{}/{}", self.host.trim_end_matches('/'), id)
    }

    /// Marks the project deployed and returns its URL. Unknown ids fail with
    /// `NotFound` after the simulated delay.
    pub async fn deploy(&self, id: Uuid) -> Result<String, AppError> {
        self.latency.simulate(Operation::Deploy).await;
        let url = self.deployment_url(id);
        self.repo
            .update_project(id, ProjectPatch::deployed(url.clone()))
            .await?;
        info!("Deployed project {id} at {url}");
        Ok(url)
    }

    pub async fn undeploy(&self, id: Uuid) -> Result<Project, AppError> {
        self.latency.simulate(Operation::Undeploy).await;
        let project = self.repo.update_project(id, ProjectPatch::undeployed()).await?;
        info!("Undeployed project {id}");
        Ok(project)
    }
}

/// Free users may keep one deployed project. Re-deploying a project that is
/// already live does not count against the limit.
pub fn ensure_deploy_allowed(
    user: &User,
    owned: &[Project],
    target: Option<Uuid>,
) -> Result<(), AppError> {
    if user.plan == Plan::Pro {
        return Ok(());
    }
    let live_elsewhere = owned
        .iter()
        .filter(|p| p.is_deployed && Some(p.id) != target)
        .count();
    if live_elsewhere >= FREE_PLAN_DEPLOY_LIMIT {
        return Err(AppError::Forbidden(DEPLOY_LIMIT_MESSAGE.to_string()));
    }
    Ok(())
}

/// Looks `id` up among the caller's projects. Someone else's project is
/// reported as missing.
pub fn find_owned(owned: &[Project], id: Uuid) -> Result<&Project, AppError> {
    owned
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
}

/// What the editor wants deployed.
#[derive(Debug, Clone)]
pub enum PublishTarget {
    Saved(Uuid),
    Draft(ProjectDraft),
}

/// Checks the plan limit, saves a draft if needed, then deploys.
/// Returns the project as stored after deployment.
pub async fn publish(
    repo: &Repository,
    deployments: &DeploymentService,
    user: &User,
    target: PublishTarget,
) -> Result<Project, AppError> {
    let owned = repo.projects_by_user(user.id).await?;
    let existing = match &target {
        PublishTarget::Saved(id) => Some(find_owned(&owned, *id)?.id),
        PublishTarget::Draft(_) => None,
    };
    ensure_deploy_allowed(user, &owned, existing)?;

    let id = match target {
        PublishTarget::Saved(id) => id,
        PublishTarget::Draft(draft) => repo.save_project(draft).await?.id,
    };
    deployments.deploy(id).await?;
    repo.get_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
