//! Runtime configuration read from the environment (and `.env` when present).

use std::{
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    num::NonZeroU32,
    str::FromStr,
    time::Duration,
};

use dotenvy::dotenv;
use thiserror::Error;

use crate::reference::{DEFAULT_MIN_AGE, MAX_AGE};

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 3000));
const DEFAULT_BANNER_SECS: u64 = 5;
const DEFAULT_SUBMIT_BURST: NonZeroU32 = NonZeroU32::MIN.saturating_add(19);
const DEFAULT_SUBMIT_WINDOW_SECS: u64 = 60;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub min_age: u32,
    pub banner_ttl: Duration,
    pub submit_burst: NonZeroU32,
    pub submit_window: Duration,
    /// Key rate limiting on proxy-supplied client headers instead of the peer.
    pub trust_forwarded: bool,
    pub log_filter: String,
}

impl AppConfig {
    #[tracing::instrument(name = "config_load")]
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(
            &lookup,
            "REGISTRY_BIND_ADDR",
            DEFAULT_BIND_ADDR,
            "expected host:port",
        )?;

        let min_age = parse_or(
            &lookup,
            "REGISTRY_MIN_AGE",
            DEFAULT_MIN_AGE,
            "expected a whole number",
        )?;
        if min_age > MAX_AGE {
            return Err(ConfigError::Invalid {
                name: "REGISTRY_MIN_AGE",
                value: min_age.to_string(),
                reason: "must not exceed the maximum age of 120",
            });
        }

        let banner_secs = parse_or(
            &lookup,
            "REGISTRY_BANNER_SECS",
            DEFAULT_BANNER_SECS,
            "expected whole seconds",
        )?;
        let banner_ttl = non_zero_secs("REGISTRY_BANNER_SECS", banner_secs)?;

        let submit_burst = parse_or(
            &lookup,
            "REGISTRY_SUBMIT_BURST",
            DEFAULT_SUBMIT_BURST,
            "expected a positive whole number",
        )?;

        let window_secs = parse_or(
            &lookup,
            "REGISTRY_SUBMIT_WINDOW_SECS",
            DEFAULT_SUBMIT_WINDOW_SECS,
            "expected whole seconds",
        )?;
        let submit_window = non_zero_secs("REGISTRY_SUBMIT_WINDOW_SECS", window_secs)?;

        let trust_forwarded = parse_or(
            &lookup,
            "REGISTRY_TRUST_FORWARDED",
            false,
            "expected true or false",
        )?;

        let log_filter = lookup("RUST_LOG")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            bind_addr,
            min_age,
            banner_ttl,
            submit_burst,
            submit_window,
            trust_forwarded,
            log_filter,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            min_age: DEFAULT_MIN_AGE,
            banner_ttl: Duration::from_secs(DEFAULT_BANNER_SECS),
            submit_burst: DEFAULT_SUBMIT_BURST,
            submit_window: Duration::from_secs(DEFAULT_SUBMIT_WINDOW_SECS),
            trust_forwarded: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn parse_or<F, T>(
    lookup: &F,
    name: &'static str,
    default: T,
    reason: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name,
                value: raw,
                reason,
            })
        }
        _ => Ok(default),
    }
}

fn non_zero_secs(name: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: secs.to_string(),
            reason: "must be greater than zero",
        });
    }
    Ok(Duration::from_secs(secs))
}
