use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::handoff::DEFAULT_GRACE;
use crate::services::billing::DEFAULT_CHECKOUT_URL;
use crate::services::deployment::DEFAULT_DEPLOY_HOST;
use crate::services::latency::LatencyPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    File,
    Redis,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "file" => Ok(StoreBackend::File),
            "redis" => Ok(StoreBackend::Redis),
            other => bail!("unknown store backend '{other}' (expected memory, file or redis)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; unset ones take the defaults below.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub store_backend: StoreBackend,
    pub store_path: PathBuf,
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,
    pub deploy_host: String,
    pub checkout_url: String,
    pub latency: LatencyPolicy,
    pub handoff_grace: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            store_backend: StoreBackend::File,
            store_path: PathBuf::from("launchai-storage.json"),
            redis_url: None,
            redis_key_prefix: "launchai:".to_string(),
            deploy_host: DEFAULT_DEPLOY_HOST.to_string(),
            checkout_url: DEFAULT_CHECKOUT_URL.to_string(),
            latency: LatencyPolicy::default(),
            handoff_grace: DEFAULT_GRACE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let latency = LatencyPolicy {
            sign_up: env_millis("LATENCY_SIGN_UP_MS", defaults.latency.sign_up)?,
            sign_in: env_millis("LATENCY_SIGN_IN_MS", defaults.latency.sign_in)?,
            sign_out: env_millis("LATENCY_SIGN_OUT_MS", defaults.latency.sign_out)?,
            generate: env_millis("LATENCY_GENERATE_MS", defaults.latency.generate)?,
            deploy: env_millis("LATENCY_DEPLOY_MS", defaults.latency.deploy)?,
            undeploy: env_millis("LATENCY_UNDEPLOY_MS", defaults.latency.undeploy)?,
            checkout: env_millis("LATENCY_CHECKOUT_MS", defaults.latency.checkout)?,
            connect_account: env_millis(
                "LATENCY_CONNECT_ACCOUNT_MS",
                defaults.latency.connect_account,
            )?,
        };

        Ok(Config {
            port: env_or("PORT", defaults.port).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            store_backend: env_or("STORE_BACKEND", defaults.store_backend)?,
            store_path: std::env::var("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            redis_url: std::env::var("REDIS_URL").ok(),
            redis_key_prefix: std::env::var("REDIS_KEY_PREFIX").unwrap_or(defaults.redis_key_prefix),
            deploy_host: std::env::var("DEPLOY_HOST").unwrap_or(defaults.deploy_host),
            checkout_url: std::env::var("CHECKOUT_URL").unwrap_or(defaults.checkout_url),
            latency,
            handoff_grace: env_millis("HANDOFF_GRACE_MS", defaults.handoff_grace)?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value '{raw}' for {key}: {e}")),
        Err(_) => Ok(default),
    }
}

fn env_millis(key: &str, default: Duration) -> Result<Duration> {
    let millis = env_or(key, default.as_millis() as u64)?;
    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!(" File ".parse::<StoreBackend>().unwrap(), StoreBackend::File);
        assert_eq!("REDIS".parse::<StoreBackend>().unwrap(), StoreBackend::Redis);
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_env_or_uses_default_when_unset() {
        let value: u16 = env_or("LAUNCHAI_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
        let delay = env_millis("LAUNCHAI_TEST_UNSET_MS", Duration::from_millis(7)).unwrap();
        assert_eq!(delay, Duration::from_millis(7));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        std::env::set_var("LAUNCHAI_TEST_BAD_PORT", "not-a-port");
        let err = env_or::<u16>("LAUNCHAI_TEST_BAD_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("LAUNCHAI_TEST_BAD_PORT"));

        std::env::set_var("LAUNCHAI_TEST_BAD_LATENCY_MS", "-5");
        assert!(env_millis("LAUNCHAI_TEST_BAD_LATENCY_MS", Duration::from_millis(500)).is_err());

        std::env::set_var("LAUNCHAI_TEST_GOOD_LATENCY_MS", "250");
        let delay = env_millis("LAUNCHAI_TEST_GOOD_LATENCY_MS", Duration::ZERO).unwrap();
        assert_eq!(delay, Duration::from_millis(250));
    }

    #[test]
    fn test_defaults_match_demo_values() {
        let config = Config::default();
        assert_eq!(config.deploy_host, "https://app.launchai.dev");
        assert_eq!(config.latency.deploy, Duration::from_millis(3000));
        assert_eq!(config.handoff_grace, Duration::from_millis(1000));
    }
}
