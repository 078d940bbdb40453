//! # Gateway Config
//!
//! Environment-based configuration for the LM Studio gateway.
//!
//! Settings are read once at process start, validated eagerly, and held in an
//! immutable [`GatewayConfig`] that is passed explicitly to the components
//! that need it. An invalid value fails fast with a [`ConfigError`] naming
//! the offending variable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use gateway_telemetry::{LogFormat, LoggingConfig};
use secrecy::Secret;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that failed validation.
    #[error("invalid value for {var}: {reason}")]
    Invalid {
        /// The environment variable name.
        var: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var: var.to_string(),
            reason: reason.into(),
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local development. Error responses include internal detail.
    #[default]
    Development,
    /// Production. Error responses omit internal detail.
    Production,
    /// Test runs.
    Test,
}

impl Environment {
    /// Whether this is a production deployment.
    #[must_use]
    pub fn is_production(self) -> bool {
        self == Self::Production
    }

    /// Whether this is a development deployment.
    #[must_use]
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(format!(
                "unknown environment '{other}', expected development, production, or test"
            )),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Listen address settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// CORS settings for the HTTP surface.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origin.
    pub origin: String,
    /// Whether credentialed requests are allowed.
    pub credentials: bool,
}

/// Settings for the outbound LM Studio connection.
#[derive(Debug, Clone)]
pub struct LmStudioConfig {
    /// Base URL of the model server.
    pub base_url: Url,
    /// Optional bearer credential sent on every outbound call.
    pub api_key: Option<Secret<String>>,
    /// Default model when a request names none.
    pub default_model: Option<String>,
    /// Default sampling temperature.
    pub temperature: f32,
    /// Default maximum output tokens.
    pub max_tokens: u32,
    /// Outbound request deadline. `None` imposes no deadline, matching a
    /// trusted local server.
    pub request_timeout: Option<Duration>,
}

/// Immutable process-wide configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Deployment environment.
    pub environment: Environment,
    /// Listen address.
    pub server: ServerConfig,
    /// Reported application version.
    pub version: String,
    /// Path prefix the API namespace is mounted under.
    pub api_prefix: String,
    /// CORS settings.
    pub cors: CorsConfig,
    /// Outbound model-server settings.
    pub lm_studio: LmStudioConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_PREFIX: &str = "/api/v1";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_LM_STUDIO_URL: &str = "http://localhost:1234";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2048;

impl GatewayConfig {
    /// Load and validate configuration from process environment variables.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] naming the first variable that fails
    /// validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Exists so tests can fabricate configurations without touching the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = parse_or(&lookup, "GATEWAY_ENV", Environment::default())?;

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        if host.is_empty() {
            return Err(ConfigError::invalid("HOST", "must not be empty"));
        }
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let version = lookup("APP_VERSION")
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

        let api_prefix = lookup("API_PREFIX").unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
        if !api_prefix.starts_with('/') || api_prefix.len() < 2 {
            return Err(ConfigError::invalid(
                "API_PREFIX",
                "must start with '/' and name at least one path segment",
            ));
        }

        let cors = CorsConfig {
            origin: lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            credentials: parse_or(&lookup, "CORS_CREDENTIALS", true)?,
        };

        let base_url = lookup("LM_STUDIO_API_URL")
            .unwrap_or_else(|| DEFAULT_LM_STUDIO_URL.to_string());
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::invalid("LM_STUDIO_API_URL", e.to_string()))?;

        let temperature: f32 = parse_or(&lookup, "LM_STUDIO_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(ConfigError::invalid(
                "LM_STUDIO_TEMPERATURE",
                "must be a non-negative number",
            ));
        }

        let lm_studio = LmStudioConfig {
            base_url,
            api_key: lookup("LM_STUDIO_API_KEY").map(Secret::new),
            default_model: lookup("LM_STUDIO_MODEL"),
            temperature,
            max_tokens: parse_or(&lookup, "LM_STUDIO_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            request_timeout: parse_opt::<u64, _>(&lookup, "LM_STUDIO_TIMEOUT_SECS")?
                .map(Duration::from_secs),
        };

        let logging = LoggingConfig {
            level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format: parse_or(&lookup, "LOG_FORMAT", LogFormat::default())?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            version,
            api_prefix,
            cors,
            lm_studio,
            logging,
        })
    }
}

/// Parse an optional variable, falling back to a default when unset.
fn parse_or<T, F>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(lookup, var)?.unwrap_or(default))
}

/// Parse an optional variable, returning `None` when unset.
fn parse_opt<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| ConfigError::invalid(var, e.to_string()))
        })
        .transpose()
}
