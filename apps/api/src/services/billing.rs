//! Mock payments. Nothing here talks to a payment provider.

use chrono::Utc;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::user::Plan;
use crate::services::latency::{LatencyPolicy, Operation};
use crate::store::{Repository, Session};

pub const DEFAULT_CHECKOUT_URL: &str = "https://checkout.stripe.com/mock-session-id";

#[derive(Clone)]
pub struct BillingService {
    repo: Repository,
    latency: LatencyPolicy,
    checkout_url: String,
}

impl BillingService {
    pub fn new(repo: Repository, latency: LatencyPolicy, checkout_url: impl Into<String>) -> Self {
        Self {
            repo,
            latency,
            checkout_url: checkout_url.into(),
        }
    }

    /// Always returns the configured placeholder URL.
    pub async fn create_checkout_session(&self, plan: Plan) -> Result<String, AppError> {
        self.latency.simulate(Operation::Checkout).await;
        debug!("Created mock checkout session for {} plan", plan.as_str());
        Ok(self.checkout_url.clone())
    }

    /// Mints a fake account id and attaches it to the current user if there
    /// is one. The id is returned either way.
    pub async fn connect_account(&self, session: &mut Session) -> Result<String, AppError> {
        self.latency.simulate(Operation::ConnectAccount).await;
        let account_id = format!("acct_{}", Utc::now().timestamp_millis());

        match self.repo.current_user(session).await? {
            Some(mut user) => {
                user.stripe_account_id = Some(account_id.clone());
                info!("Connected account {account_id} to user {}", user.id);
                self.repo.set_current_user(session, user).await?;
            }
            None => debug!("Minted account {account_id} with no current user"),
        }
        Ok(account_id)
    }
}
