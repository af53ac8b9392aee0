//! Single-read handoff of a generated app from `/generate` to the editor.
//!
//! There is one slot per profile. Each generation overwrites it, so an unread
//! payload is dropped as soon as the next one arrives. The reader may arrive
//! before the writer has finished, so a miss waits one grace period and looks
//! again before giving up.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::project::GeneratedApp;

pub const DEFAULT_GRACE: Duration = Duration::from_millis(1000);

#[derive(Clone)]
pub struct HandoffCache {
    slot: Arc<RwLock<Option<(Uuid, GeneratedApp)>>>,
    grace: Duration,
}

impl HandoffCache {
    pub fn new(grace: Duration) -> Self {
        Self {
            slot: Arc::new(RwLock::new(None)),
            grace,
        }
    }

    pub async fn put(&self, app: GeneratedApp) -> Uuid {
        let token = Uuid::new_v4();
        self.put_with_token(token, app).await;
        token
    }

    /// Replaces whatever is in the slot.
    pub async fn put_with_token(&self, token: Uuid, app: GeneratedApp) {
        if let Some((previous, _)) = self.slot.write().await.replace((token, app)) {
            debug!("Handoff {previous} replaced before it was read");
        }
    }

    /// Removes and returns the payload if the slot holds `token`.
    pub async fn take(&self, token: Uuid) -> Option<GeneratedApp> {
        if let Some(app) = self.take_now(token).await {
            return Some(app);
        }
        if self.grace.is_zero() {
            return None;
        }
        tokio::time::sleep(self.grace).await;
        self.take_now(token).await
    }

    async fn take_now(&self, token: Uuid) -> Option<GeneratedApp> {
        let mut slot = self.slot.write().await;
        match slot.take() {
            Some((held, app)) if held == token => Some(app),
            other => {
                *slot = other;
                None
            }
        }
    }
}
