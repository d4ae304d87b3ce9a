//! Runtime configuration.
//!
//! Non-secret settings load through OrthoConfig from CLI flags, `ROUTESLIP_*`
//! environment variables and config files. Secrets are read separately via
//! [`mockable::Env`] so they never appear in CLI help or config dumps.

use std::net::SocketAddr;
use std::time::Duration;

use mockable::{DefaultEnv, Env};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::DEFAULT_DRAFT_TTL;
use crate::inbound::http::state::DEFAULT_UPLOAD_LIMIT;
use crate::outbound::gemini::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable holding the shared history password.
pub const HISTORY_PASSWORD_ENV: &str = "HISTORY_PASSWORD";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_GEMINI_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors raised while validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid Gemini endpoint '{value}': {source}")]
    GeminiEndpoint {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

/// Server settings loaded via OrthoConfig.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROUTESLIP")]
pub struct AppSettings {
    /// Socket address to listen on.
    #[ortho_config(default = "0.0.0.0:8080".to_owned())]
    pub bind_addr: String,
    /// Redis connection URL; the in-memory store is used when absent.
    pub redis_url: Option<String>,
    /// Lifetime of draft receipt images, in seconds.
    pub draft_ttl_secs: Option<u64>,
    /// Base URL of the Gemini API.
    pub gemini_endpoint: Option<String>,
    /// Gemini model name.
    pub gemini_model: Option<String>,
    /// Per-call timeout for the extraction service, in seconds.
    pub gemini_timeout_secs: Option<u64>,
    /// Largest accepted multipart upload, in bytes.
    pub upload_limit_bytes: Option<usize>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            redis_url: None,
            draft_ttl_secs: None,
            gemini_endpoint: None,
            gemini_model: None,
            gemini_timeout_secs: None,
            upload_limit_bytes: None,
        }
    }
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = self.bind_addr.trim();
        value.parse().map_err(|source| ConfigError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Redis URL, ignoring blank values.
    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }

    pub fn draft_ttl(&self) -> Result<Duration, ConfigError> {
        positive_secs(self.draft_ttl_secs, DEFAULT_DRAFT_TTL, "draft_ttl_secs")
    }

    /// Gemini base URL, normalised to end with `/` so model paths join
    /// beneath it.
    pub fn gemini_endpoint(&self) -> Result<Url, ConfigError> {
        let raw = self
            .gemini_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_ENDPOINT);
        let normalised = if raw.ends_with('/') {
            raw.to_owned()
        } else {
            format!("{raw}/")
        };
        Url::parse(&normalised).map_err(|source| ConfigError::GeminiEndpoint {
            value: raw.to_owned(),
            source,
        })
    }

    pub fn gemini_model(&self) -> &str {
        self.gemini_model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    pub fn gemini_timeout(&self) -> Result<Duration, ConfigError> {
        positive_secs(
            self.gemini_timeout_secs,
            DEFAULT_GEMINI_TIMEOUT,
            "gemini_timeout_secs",
        )
    }

    pub fn upload_limit(&self) -> Result<usize, ConfigError> {
        match self.upload_limit_bytes {
            Some(0) => Err(ConfigError::Zero {
                name: "upload_limit_bytes",
            }),
            Some(limit) => Ok(limit),
            None => Ok(DEFAULT_UPLOAD_LIMIT),
        }
    }
}

fn positive_secs(
    value: Option<u64>,
    default: Duration,
    name: &'static str,
) -> Result<Duration, ConfigError> {
    match value {
        Some(0) => Err(ConfigError::Zero { name }),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Ok(default),
    }
}

/// Secret values read from the environment. Empty values count as unset.
#[derive(Default)]
pub struct Secrets {
    pub gemini_api_key: Option<Zeroizing<String>>,
    pub history_password: Option<Zeroizing<String>>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("gemini_api_key", &self.gemini_api_key.is_some())
            .field("history_password", &self.history_password.is_some())
            .finish()
    }
}

/// Read [`Secrets`] through `env`.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use routeslip::config::secrets_from_env;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "HISTORY_PASSWORD" => Some("letmein".to_owned()),
///     _ => None,
/// });
///
/// let secrets = secrets_from_env(&env);
/// assert!(secrets.gemini_api_key.is_none());
/// assert_eq!(secrets.history_password.as_deref().map(String::as_str), Some("letmein"));
/// ```
pub fn secrets_from_env<E: Env>(env: &E) -> Secrets {
    Secrets {
        gemini_api_key: secret(env, GEMINI_API_KEY_ENV),
        history_password: secret(env, HISTORY_PASSWORD_ENV),
    }
}

/// Read [`Secrets`] from the process environment.
pub fn secrets_from_process_env() -> Secrets {
    secrets_from_env(&DefaultEnv::new())
}

fn secret<E: Env>(env: &E, name: &str) -> Option<Zeroizing<String>> {
    env.string(name)
        .filter(|value| !value.is_empty())
        .map(Zeroizing::new)
}
