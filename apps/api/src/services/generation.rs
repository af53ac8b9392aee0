//! Code generation behind the `/generate` route. The generator is a trait so it can be swapped.
//!
//! Default: `TemplateGenerator`, which routes the prompt to a canned template.
//! `AppState` holds an `Arc<dyn CodeGenerator>`.

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::project::{CodeBundle, GeneratedApp};
use crate::services::latency::{LatencyPolicy, Operation};
use crate::templates::catalog::Template;
use crate::templates::resolver::PromptResolver;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GeneratedCode {
    pub code: CodeBundle,
    pub title: String,
    pub description: String,
}

impl GeneratedCode {
    pub fn from_template(template: &Template) -> Self {
        Self {
            code: template.code.to_bundle(),
            title: format!("{} App", template.name),
            description: format!("A {} built with LaunchAI", template.name.to_lowercase()),
        }
    }

    /// Packages the result with its prompt for the editor handoff.
    pub fn into_app(self, prompt: impl Into<String>) -> GeneratedApp {
        GeneratedApp {
            prompt: prompt.into(),
            title: self.title,
            description: self.description,
            code: self.code,
        }
    }
}

#[async_trait]
pub trait CodeGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedCode, AppError>;
}

pub struct TemplateGenerator {
    resolver: PromptResolver,
    latency: LatencyPolicy,
}

impl TemplateGenerator {
    pub fn new(resolver: PromptResolver, latency: LatencyPolicy) -> Self {
        Self { resolver, latency }
    }
}

#[async_trait]
impl CodeGenerator for TemplateGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedCode, AppError> {
        self.latency.simulate(Operation::Generate).await;
        let template = self.resolver.resolve(prompt);
        info!("Prompt resolved to template '{}'", template.name);
        Ok(GeneratedCode::from_template(template))
    }
}
