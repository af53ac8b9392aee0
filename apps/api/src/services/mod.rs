// Mock lifecycle services: auth, generation, deployment, billing.
// Each call sleeps for its configured latency, then acts on the repository.

pub mod auth;
pub mod billing;
pub mod deployment;
pub mod generation;
pub mod latency;
