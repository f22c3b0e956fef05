//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PRINTFUL_API_KEY` - Printful private token (bearer credential)
//!
//! ## Optional
//! - `PRINTFUL_API_URL` - Printful base URL (default: <https://api.printful.com>)
//! - `PRINTFUL_STORE_ID` - Store ID, required by Printful for account-level tokens
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `CATEGORY_CACHE_TTL_SECS` - Category list TTL (default: 3600)
//! - `PRODUCT_CACHE_TTL_SECS` - Per-product TTL (default: 600)
//! - `CATALOG_CACHE_TTL_SECS` - Full catalog TTL (default: 600)
//! - `CATALOG_FETCH_CONCURRENCY` - Max concurrent product detail requests (default: unbounded)
//! - `CORS_ALLOWED_ORIGIN` - Frontend origin allowed by CORS (default: any)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroUsize;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::catalog::CachePolicy;

const DEFAULT_PRINTFUL_API_URL: &str = "https://api.printful.com";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Printful API configuration
    pub printful: PrintfulConfig,
    /// Cache TTLs
    pub cache: CachePolicy,
    /// Upper bound on concurrent product detail requests, `None` for unbounded
    pub fetch_concurrency: Option<NonZeroUsize>,
    /// Origin allowed to call the API from a browser, `None` for any
    pub cors_allowed_origin: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Printful API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PrintfulConfig {
    /// Base URL without trailing slash
    pub api_url: String,
    /// Private token sent as a bearer credential
    pub api_key: SecretString,
    /// Store ID sent as `X-PF-Store-Id`
    pub store_id: Option<String>,
}

impl std::fmt::Debug for PrintfulConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintfulConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("store_id", &self.store_id)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let printful = PrintfulConfig::from_env()?;
        let defaults = CachePolicy::default();
        let cache = CachePolicy {
            categories_ttl: get_duration_secs("CATEGORY_CACHE_TTL_SECS", defaults.categories_ttl)?,
            product_ttl: get_duration_secs("PRODUCT_CACHE_TTL_SECS", defaults.product_ttl)?,
            catalog_ttl: get_duration_secs("CATALOG_CACHE_TTL_SECS", defaults.catalog_ttl)?,
        };
        let fetch_concurrency = get_optional_env("CATALOG_FETCH_CONCURRENCY")
            .map(|value| parse_concurrency("CATALOG_FETCH_CONCURRENCY", &value))
            .transpose()?;

        Ok(Self {
            host,
            port,
            printful,
            cache,
            fetch_concurrency,
            cors_allowed_origin: get_optional_env("CORS_ALLOWED_ORIGIN"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PrintfulConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(
            "PRINTFUL_API_URL",
            &get_env_or_default("PRINTFUL_API_URL", DEFAULT_PRINTFUL_API_URL),
        )?;

        Ok(Self {
            api_url,
            api_key: get_validated_secret("PRINTFUL_API_KEY")?,
            store_id: get_optional_env("PRINTFUL_STORE_ID"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a duration in whole seconds, falling back to `default`.
fn get_duration_secs(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| {
        value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a positive concurrency limit.
fn parse_concurrency(key: &str, value: &str) -> Result<NonZeroUsize, ConfigError> {
    value
        .parse::<NonZeroUsize>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Check that the API URL parses and strip any trailing slash.
fn normalize_api_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API tokens are random; low entropy means a hand-typed value
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token issued by Printful."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
