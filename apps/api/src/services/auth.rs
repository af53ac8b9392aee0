//! Mock auth: any non-empty email/password pair signs in.

use tracing::info;

use crate::errors::AppError;
use crate::models::user::{Plan, User};
use crate::services::latency::{LatencyPolicy, Operation};
use crate::store::{Repository, Session};

#[derive(Clone)]
pub struct AuthService {
    repo: Repository,
    latency: LatencyPolicy,
}

impl AuthService {
    pub fn new(repo: Repository, latency: LatencyPolicy) -> Self {
        Self { repo, latency }
    }

    /// Creates a free-plan user and makes it current, replacing any previous one.
    pub async fn sign_up(
        &self,
        session: &mut Session,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        validate_credentials(email, password)?;
        self.latency.simulate(Operation::SignUp).await;
        let user = User::new(email, Plan::Free);
        info!("Signed up user {} ({})", user.id, user.email);
        self.repo.set_current_user(session, user).await
    }

    /// Creates a fresh user for `email`; the plan comes from [`Plan::for_email`].
    pub async fn sign_in(
        &self,
        session: &mut Session,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        validate_credentials(email, password)?;
        self.latency.simulate(Operation::SignIn).await;
        let user = User::new(email, Plan::for_email(email));
        info!("Signed in user {} on {} plan", user.id, user.plan.as_str());
        self.repo.set_current_user(session, user).await
    }

    pub async fn sign_out(&self, session: &mut Session) -> Result<(), AppError> {
        self.latency.simulate(Operation::SignOut).await;
        self.repo.clear_current_user(session).await
    }

    pub async fn current_user(&self, session: &mut Session) -> Result<Option<User>, AppError> {
        self.repo.current_user(session).await
    }

    /// Like [`current_user`](Self::current_user) but fails with `Unauthorized`.
    pub async fn require_user(&self, session: &mut Session) -> Result<User, AppError> {
        self.current_user(session).await?.ok_or(AppError::Unauthorized)
    }

    /// Changes the current user's plan. Returns `None` when nobody is signed in.
    pub async fn upgrade_plan(
        &self,
        session: &mut Session,
        plan: Plan,
    ) -> Result<Option<User>, AppError> {
        let Some(mut user) = self.current_user(session).await? else {
            return Ok(None);
        };
        user.plan = plan;
        info!("User {} moved to {} plan", user.id, plan.as_str());
        self.repo.set_current_user(session, user).await.map(Some)
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.trim().is_empty() {
        return Err(AppError::Validation("email cannot be empty".to_string()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("password cannot be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn service() -> AuthService {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        AuthService::new(repo, LatencyPolicy::none())
    }

    #[tokio::test]
    async fn test_sign_in_pro_email_gets_pro_plan() {
        let auth = service();
        let user = auth
            .sign_in(&mut Session::new(), "demo@pro.com", "anything")
            .await
            .unwrap();
        assert_eq!(user.plan, Plan::Pro);
        assert_eq!(user.email, "demo@pro.com");
    }

    #[tokio::test]
    async fn test_sign_in_free_email_gets_free_plan() {
        let auth = service();
        let user = auth
            .sign_in(&mut Session::new(), "demo@free.com", "x")
            .await
            .unwrap();
        assert_eq!(user.plan, Plan::Free);
    }

    #[tokio::test]
    async fn test_sign_up_is_always_free() {
        let auth = service();
        let user = auth
            .sign_up(&mut Session::new(), "demo@pro.com", "x")
            .await
            .unwrap();
        assert_eq!(user.plan, Plan::Free);
    }

    #[tokio::test]
    async fn test_sign_in_replaces_previous_user() {
        let auth = service();
        auth.sign_in(&mut Session::new(), "first@free.com", "x")
            .await
            .unwrap();
        let second = auth
            .sign_in(&mut Session::new(), "second@free.com", "x")
            .await
            .unwrap();

        let current = auth.current_user(&mut Session::new()).await.unwrap();
        assert_eq!(current, Some(second));
    }

    #[tokio::test]
    async fn test_empty_credentials_are_rejected() {
        let auth = service();
        let err = auth.sign_in(&mut Session::new(), "  ", "x").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = auth.sign_up(&mut Session::new(), "a@b.c", "").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_sign_out_clears_user() {
        let auth = service();
        let mut session = Session::new();
        auth.sign_in(&mut session, "a@b.c", "x").await.unwrap();
        auth.sign_out(&mut session).await.unwrap();

        assert!(session.cached_user().is_none());
        assert!(auth.current_user(&mut Session::new()).await.unwrap().is_none());
        let err = auth.require_user(&mut Session::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_upgrade_plan_persists() {
        let auth = service();
        auth.sign_in(&mut Session::new(), "demo@free.com", "x")
            .await
            .unwrap();

        let upgraded = auth
            .upgrade_plan(&mut Session::new(), Plan::Pro)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(upgraded.plan, Plan::Pro);

        let reloaded = auth.require_user(&mut Session::new()).await.unwrap();
        assert_eq!(reloaded.plan, Plan::Pro);
        assert_eq!(reloaded.id, upgraded.id);
    }

    #[tokio::test]
    async fn test_upgrade_without_user_is_noop() {
        let auth = service();
        let result = auth.upgrade_plan(&mut Session::new(), Plan::Pro).await.unwrap();
        assert!(result.is_none());
        assert!(auth.current_user(&mut Session::new()).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_applies_latency() {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        let auth = AuthService::new(repo, LatencyPolicy::default());
        let start = tokio::time::Instant::now();
        auth.sign_in(&mut Session::new(), "a@b.c", "x").await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(500));
    }
}
