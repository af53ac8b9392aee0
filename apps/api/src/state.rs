use std::sync::Arc;

use crate::config::Config;
use crate::handoff::HandoffCache;
use crate::services::auth::AuthService;
use crate::services::billing::BillingService;
use crate::services::deployment::DeploymentService;
use crate::services::generation::{CodeGenerator, TemplateGenerator};
use crate::store::{KeyValueStore, Repository};
use crate::templates::resolver::PromptResolver;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    #[allow(dead_code)]
    pub config: Config,
    pub repo: Repository,
    pub auth: AuthService,
    /// Pluggable generator. Default: TemplateGenerator.
    pub generator: Arc<dyn CodeGenerator>,
    pub deployments: DeploymentService,
    pub billing: BillingService,
    pub handoff: HandoffCache,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        let repo = Repository::new(store);
        let latency = config.latency.clone();
        Self {
            auth: AuthService::new(repo.clone(), latency.clone()),
            generator: Arc::new(TemplateGenerator::new(
                PromptResolver::default(),
                latency.clone(),
            )),
            deployments: DeploymentService::new(
                repo.clone(),
                latency.clone(),
                config.deploy_host.clone(),
            ),
            billing: BillingService::new(repo.clone(), latency, config.checkout_url.clone()),
            handoff: HandoffCache::new(config.handoff_grace),
            repo,
            config,
        }
    }
}
