//! Repository over the key-value store: one current-user record and one
//! ordered project sequence, each serialized as a single JSON blob.
//!
//! Every project write is read-modify-write of the whole sequence. Two
//! callers that overlap can race; the last writer wins.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::{Project, ProjectDraft, ProjectPatch};
use crate::models::user::User;

use super::{KeyValueStore, Session, StoreError};

pub const USER_KEY: &str = "launchai_user";
pub const PROJECTS_KEY: &str = "launchai_projects";

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn KeyValueStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // ── current user ───────────────────────────────────────────────────────

    /// Returns the session's cached user, else the stored user (now cached).
    pub async fn current_user(&self, session: &mut Session) -> Result<Option<User>, AppError> {
        if let Some(user) = session.cached_user() {
            return Ok(Some(user.clone()));
        }
        let user: Option<User> = self.load(USER_KEY).await?;
        if let Some(user) = &user {
            session.cache(user.clone());
        }
        Ok(user)
    }

    pub async fn set_current_user(&self, session: &mut Session, user: User) -> Result<User, AppError> {
        self.store
            .set(USER_KEY, serde_json::to_string(&user).map_err(StoreError::from)?)
            .await?;
        session.cache(user.clone());
        Ok(user)
    }

    pub async fn clear_current_user(&self, session: &mut Session) -> Result<(), AppError> {
        session.clear();
        self.store.remove(USER_KEY).await?;
        Ok(())
    }

    // ── projects ───────────────────────────────────────────────────────────

    /// Full project sequence in insertion order. A missing key is empty.
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.load(PROJECTS_KEY).await?.unwrap_or_default())
    }

    pub async fn save_project(&self, draft: ProjectDraft) -> Result<Project, AppError> {
        let project = draft.into_project(Utc::now());
        let mut projects = self.list_projects().await?;
        projects.push(project.clone());
        self.write_projects(&projects).await?;
        info!("Saved project {} for user {}", project.id, project.user_id);
        Ok(project)
    }

    /// Merges `patch` over the stored project. Unknown ids fail with
    /// `NotFound` and leave the sequence untouched.
    pub async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> Result<Project, AppError> {
        let mut projects = self.list_projects().await?;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))?;
        patch.apply(project, Utc::now());
        let updated = project.clone();
        self.write_projects(&projects).await?;
        Ok(updated)
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        Ok(self.list_projects().await?.into_iter().find(|p| p.id == id))
    }

    pub async fn projects_by_user(&self, user_id: Uuid) -> Result<Vec<Project>, AppError> {
        Ok(self
            .list_projects()
            .await?
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .collect())
    }

    /// Removes the project and writes back the rest. Returns whether anything
    /// was removed.
    pub async fn delete_project(&self, id: Uuid) -> Result<bool, AppError> {
        let mut projects = self.list_projects().await?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        self.write_projects(&projects).await?;
        Ok(projects.len() != before)
    }

    async fn write_projects(&self, projects: &[Project]) -> Result<(), AppError> {
        let raw = serde_json::to_string(projects).map_err(StoreError::from)?;
        self.store.set(PROJECTS_KEY, raw).await?;
        Ok(())
    }

    /// Reads and decodes one blob. Undecodable data is dropped so the
    /// collection starts over empty instead of failing every later call.
    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Stored value under '{key}' is malformed, resetting: {e}");
                self.store.remove(key).await?;
                Ok(None)
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::CodeBundle;
    use crate::models::user::Plan;
    use crate::store::MemoryStore;

    fn repo_with_store() -> (Repository, MemoryStore) {
        let store = MemoryStore::new();
        (Repository::new(Arc::new(store.clone())), store)
    }

    fn draft(user_id: Uuid, title: &str) -> ProjectDraft {
        ProjectDraft {
            user_id,
            title: title.to_string(),
            description: format!("{title} description"),
            prompt: "Build a todo list app".to_string(),
            code: CodeBundle {
                html: "<ul></ul>".to_string(),
                css: "ul {}".to_string(),
                js: "let todos = [];".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_save_then_get_round_trips() {
        let (repo, _) = repo_with_store();
        let user_id = Uuid::new_v4();
        let saved = repo.save_project(draft(user_id, "Todo")).await.unwrap();

        let fetched = repo.get_project(saved.id).await.unwrap().unwrap();
        assert_eq!(fetched, saved);
        assert_eq!(fetched.user_id, user_id);
        assert_eq!(fetched.title, "Todo");
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert!(!fetched.is_deployed);
    }

    #[tokio::test]
    async fn test_list_is_empty_without_key_and_stable_across_reads() {
        let (repo, _) = repo_with_store();
        assert!(repo.list_projects().await.unwrap().is_empty());

        repo.save_project(draft(Uuid::new_v4(), "A")).await.unwrap();
        let first = repo.list_projects().await.unwrap();
        let second = repo.list_projects().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_projects_by_user_keeps_insertion_order() {
        let (repo, _) = repo_with_store();
        let owner = Uuid::new_v4();
        let a = repo.save_project(draft(owner, "A")).await.unwrap();
        repo.save_project(draft(Uuid::new_v4(), "Other")).await.unwrap();
        let b = repo.save_project(draft(owner, "B")).await.unwrap();

        let owned = repo.projects_by_user(owner).await.unwrap();
        let ids: Vec<Uuid> = owned.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_update_merges_and_refreshes_updated_at() {
        let (repo, _) = repo_with_store();
        let saved = repo.save_project(draft(Uuid::new_v4(), "Old")).await.unwrap();

        let patch = ProjectPatch {
            title: Some("New".to_string()),
            ..ProjectPatch::default()
        };
        let updated = repo.update_project(saved.id, patch).await.unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.description, saved.description);
        assert_eq!(updated.created_at, saved.created_at);
        assert!(updated.updated_at >= saved.updated_at);
        assert_eq!(repo.get_project(saved.id).await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found_and_changes_nothing() {
        let (repo, store) = repo_with_store();
        repo.save_project(draft(Uuid::new_v4(), "A")).await.unwrap();
        let before = store.get(PROJECTS_KEY).await.unwrap();

        let err = repo
            .update_project(Uuid::new_v4(), ProjectPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.get(PROJECTS_KEY).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let (repo, _) = repo_with_store();
        let owner = Uuid::new_v4();
        let a = repo.save_project(draft(owner, "A")).await.unwrap();
        let b = repo.save_project(draft(owner, "B")).await.unwrap();

        assert!(repo.delete_project(a.id).await.unwrap());
        assert!(!repo.delete_project(a.id).await.unwrap());

        let remaining = repo.list_projects().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
    }

    #[tokio::test]
    async fn test_malformed_projects_reset_to_empty() {
        let (repo, store) = repo_with_store();
        store.set(PROJECTS_KEY, "[{\"broken\":".to_string()).await.unwrap();

        assert!(repo.list_projects().await.unwrap().is_empty());
        assert_eq!(store.get(PROJECTS_KEY).await.unwrap(), None);

        let saved = repo.save_project(draft(Uuid::new_v4(), "A")).await.unwrap();
        assert_eq!(repo.list_projects().await.unwrap(), vec![saved]);
    }

    #[tokio::test]
    async fn test_current_user_loads_from_store_and_caches() {
        let (repo, _) = repo_with_store();
        let mut writer = Session::new();
        let user = repo
            .set_current_user(&mut writer, User::new("demo@pro.com", Plan::Pro))
            .await
            .unwrap();

        let mut reader = Session::new();
        assert!(reader.cached_user().is_none());
        let loaded = repo.current_user(&mut reader).await.unwrap().unwrap();
        assert_eq!(loaded, user);
        assert_eq!(reader.cached_user(), Some(&user));
    }

    #[tokio::test]
    async fn test_cached_user_can_go_stale() {
        let (repo, _) = repo_with_store();
        let mut stale = Session::new();
        let first = repo
            .set_current_user(&mut stale, User::new("first@free.com", Plan::Free))
            .await
            .unwrap();

        let mut other = Session::new();
        repo.set_current_user(&mut other, User::new("second@free.com", Plan::Free))
            .await
            .unwrap();

        // The first session keeps serving its cached copy.
        assert_eq!(repo.current_user(&mut stale).await.unwrap(), Some(first));
        let fresh = repo.current_user(&mut Session::new()).await.unwrap().unwrap();
        assert_eq!(fresh.email, "second@free.com");
    }

    #[tokio::test]
    async fn test_clear_current_user() {
        let (repo, store) = repo_with_store();
        let mut session = Session::new();
        repo.set_current_user(&mut session, User::new("a@b.c", Plan::Free))
            .await
            .unwrap();

        repo.clear_current_user(&mut session).await.unwrap();
        assert!(session.cached_user().is_none());
        assert_eq!(store.get(USER_KEY).await.unwrap(), None);
        assert_eq!(repo.current_user(&mut session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_user_is_treated_as_signed_out() {
        let (repo, store) = repo_with_store();
        store.set(USER_KEY, "{\"id\": 42}".to_string()).await.unwrap();
        assert_eq!(repo.current_user(&mut Session::new()).await.unwrap(), None);
        assert_eq!(store.get(USER_KEY).await.unwrap(), None);
    }
}
