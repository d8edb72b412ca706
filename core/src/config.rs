//! Client configuration.
//!
//! Defaults match the development setup: a local API on port 8080, a ten
//! second timeout and no automatic login persistence. `from_env` overrides
//! individual values from `TASK_API_*` variables.

use std::env;

use serde::{Deserialize, Serialize};

use crate::endpoints::Endpoints;
use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LOGIN_ROUTE: &str = "/pages/login/login";

pub const ENV_BASE_URL: &str = "TASK_API_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "TASK_API_TIMEOUT_MS";
pub const ENV_PERSIST_LOGIN: &str = "TASK_API_PERSIST_LOGIN";

/// Deserialization goes through the same checks as `from_env`: a zero
/// timeout is rejected and the base URL loses its trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClientConfig")]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Route the UI is sent to when the session expires.
    pub login_route: String,
    /// Store the token from a successful login response automatically.
    /// Off by default: callers decide what to do with a fresh session.
    pub persist_login: bool,
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            persist_login: false,
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_persist_login(mut self, persist_login: bool) -> Self {
        self.persist_login = persist_login;
        self
    }

    /// Defaults overridden by whichever `TASK_API_*` variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = normalize_base_url(&base_url);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let timeout_ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_TIMEOUT_MS,
                value: raw.clone(),
            })?;
            if timeout_ms == 0 {
                return Err(ConfigError::ZeroTimeout);
            }
            config.timeout_ms = timeout_ms;
        }

        if let Some(raw) = lookup(ENV_PERSIST_LOGIN) {
            config.persist_login = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: ENV_PERSIST_LOGIN,
                        value: raw,
                    })
                }
            };
        }

        Ok(config)
    }

    /// Base address plus path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

#[derive(Deserialize)]
#[serde(default)]
struct RawClientConfig {
    base_url: String,
    timeout_ms: u64,
    login_route: String,
    persist_login: bool,
    endpoints: Endpoints,
}

impl Default for RawClientConfig {
    fn default() -> Self {
        let ClientConfig {
            base_url,
            timeout_ms,
            login_route,
            persist_login,
            endpoints,
        } = ClientConfig::default();
        Self {
            base_url,
            timeout_ms,
            login_route,
            persist_login,
            endpoints,
        }
    }
}

impl TryFrom<RawClientConfig> for ClientConfig {
    type Error = ConfigError;

    fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
        if raw.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            base_url: normalize_base_url(&raw.base_url),
            timeout_ms: raw.timeout_ms,
            login_route: raw.login_route,
            persist_login: raw.persist_login,
            endpoints: raw.endpoints,
        })
    }
}
