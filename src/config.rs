// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_NGINX_IMAGE: &str = "nginx:1.27-alpine";
pub const DEFAULT_WATCH_NAMESPACE: &str = "default";

/// Exponential backoff applied after the DummySite watch fails
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffConfig {
    /// Delay after the first failure, and after any successful watch session
    pub initial: Duration,
    /// Upper bound for the delay
    pub max: Duration,
    /// Growth factor per consecutive failure
    pub factor: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(1000),
            max: Duration::from_millis(30_000),
            factor: 1.5,
        }
    }
}

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Image run by the website Deployment
    pub nginx_image: String,
    /// Namespace whose DummySites are watched
    pub watch_namespace: String,
    pub backoff: BackoffConfig,
    /// Timeout for a single website fetch
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nginx_image: DEFAULT_NGINX_IMAGE.to_string(),
            watch_namespace: DEFAULT_WATCH_NAMESPACE.to_string(),
            backoff: BackoffConfig::default(),
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let nginx_image = lookup("NGINX_IMAGE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.nginx_image);
        let watch_namespace = lookup("WATCH_NAMESPACE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.watch_namespace);

        let initial_ms: u64 = parse_or(&lookup, "BACKOFF_INITIAL_MS", 1000)?;
        let max_ms: u64 = parse_or(&lookup, "BACKOFF_MAX_MS", 30_000)?;
        let factor: f64 = parse_or(&lookup, "BACKOFF_FACTOR", 1.5)?;
        let fetch_timeout_secs: u64 = parse_or(&lookup, "FETCH_TIMEOUT_SECS", 30)?;

        if initial_ms == 0 {
            bail!("BACKOFF_INITIAL_MS must be greater than zero");
        }
        if initial_ms > max_ms {
            bail!(
                "BACKOFF_INITIAL_MS ({}) must not exceed BACKOFF_MAX_MS ({})",
                initial_ms,
                max_ms
            );
        }
        if !factor.is_finite() || factor < 1.0 {
            bail!("BACKOFF_FACTOR must be a finite number >= 1.0, got {}", factor);
        }

        Ok(Config {
            nginx_image,
            watch_namespace,
            backoff: BackoffConfig {
                initial: Duration::from_millis(initial_ms),
                max: Duration::from_millis(max_ms),
                factor,
            },
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} environment variable is not valid: {:?}", key, raw)),
        None => Ok(default),
    }
}
