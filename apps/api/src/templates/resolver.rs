//! Prompt resolver: routes a free-text prompt to exactly one template.
//!
//! Algorithm:
//! 1. Lowercase the prompt.
//! 2. Blank prompts go straight to the fallback template.
//! 3. Walk the rules in declared order; the first rule whose trigger is
//!    contained in the prompt, or which contains the prompt, wins.
//! 4. No hit → fallback.
//!
//! This is first-match routing, not ranking. Reordering the rules changes
//! results for prompts that hit more than one trigger.

use crate::templates::catalog::{default_template, Template, CATALOG};

/// One routing rule: a pure predicate over the normalized prompt.
#[derive(Debug, Clone, Copy)]
pub struct MatchRule {
    pub template: &'static Template,
}

impl MatchRule {
    pub fn new(template: &'static Template) -> Self {
        Self { template }
    }

    /// Containment in either direction, so "calc" hits "calculator" and
    /// "build a calculator" does too.
    pub fn matches(&self, normalized: &str) -> bool {
        let trigger = self.template.trigger;
        normalized.contains(trigger) || trigger.contains(normalized)
    }
}

#[derive(Debug, Clone)]
pub struct PromptResolver {
    rules: Vec<MatchRule>,
    fallback: &'static Template,
}

impl Default for PromptResolver {
    fn default() -> Self {
        Self::new(
            CATALOG.iter().copied().map(MatchRule::new).collect(),
            default_template(),
        )
    }
}

impl PromptResolver {
    pub fn new(rules: Vec<MatchRule>, fallback: &'static Template) -> Self {
        Self { rules, fallback }
    }

    pub fn resolve(&self, prompt: &str) -> &'static Template {
        let normalized = normalize(prompt);
        // An empty prompt is a substring of every trigger; route it to the
        // fallback instead of whichever rule happens to be first.
        if normalized.trim().is_empty() {
            return self.fallback;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| rule.template)
            .unwrap_or(self.fallback)
    }
}

pub fn normalize(prompt: &str) -> String {
    prompt.to_lowercase()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
