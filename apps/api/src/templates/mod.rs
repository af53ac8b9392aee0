//! Canned app templates and the prompt → template routing rules.
//!
//! There is no model behind "generation": a prompt is routed to one of a few
//! hardcoded bundles by substring matching.

pub mod catalog;
pub mod resolver;
