//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `FASHION_API_BASE_URL` - Catalog API root (default: `http://localhost:8000/api/v1`)
//! - `FASHION_IMAGE_BASE_URL` - Origin serving `/images` (default: origin of the API URL)
//! - `FASHION_PAGE_SIZE` - Products per listing request, 1-100 (default: 20)
//! - `FASHION_RECOMMEND_LIMIT` - Recommendations per request (default: 10)
//! - `FASHION_CACHE_TTL_SECS` - Product detail cache lifetime, 0 disables (default: 300)

use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_RECOMMEND_LIMIT: u32 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Catalog API root, without a trailing slash
    pub api_base_url: String,
    /// Origin serving product images
    pub image_base_url: String,
    /// Products requested per listing page
    pub page_size: u32,
    /// Recommendations requested per query
    pub recommend_limit: u32,
    /// Product detail cache lifetime (`Duration::ZERO` disables caching)
    pub cache_ttl: Duration,
}

impl ClientConfig {
    /// Build a configuration for `api_base_url` with every other setting at its default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be parsed.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        let (api_base_url, image_base_url) = parse_api_base_url(api_base_url)?;
        Ok(Self {
            api_base_url,
            image_base_url,
            page_size: DEFAULT_PAGE_SIZE,
            recommend_limit: DEFAULT_RECOMMEND_LIMIT,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = lookup("FASHION_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let mut config = Self::new(&base)?;

        if let Some(image_base) = lookup("FASHION_IMAGE_BASE_URL") {
            Url::parse(&image_base).map_err(|e| {
                ConfigError::InvalidEnvVar("FASHION_IMAGE_BASE_URL".to_string(), e.to_string())
            })?;
            config.image_base_url = image_base.trim_end_matches('/').to_string();
        }

        config.page_size = parse_or_default(&lookup, "FASHION_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if !(1..=MAX_PAGE_SIZE).contains(&config.page_size) {
            return Err(ConfigError::InvalidEnvVar(
                "FASHION_PAGE_SIZE".to_string(),
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        config.recommend_limit =
            parse_or_default(&lookup, "FASHION_RECOMMEND_LIMIT", DEFAULT_RECOMMEND_LIMIT)?;
        if config.recommend_limit == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "FASHION_RECOMMEND_LIMIT".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        config.cache_ttl = Duration::from_secs(parse_or_default(
            &lookup,
            "FASHION_CACHE_TTL_SECS",
            DEFAULT_CACHE_TTL_SECS,
        )?);

        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: "http://localhost:8000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            recommend_limit: DEFAULT_RECOMMEND_LIMIT,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Normalize the API root and derive the image origin from it.
fn parse_api_base_url(raw: &str) -> Result<(String, String), ConfigError> {
    let url = Url::parse(raw).map_err(|e| {
        ConfigError::InvalidEnvVar("FASHION_API_BASE_URL".to_string(), e.to_string())
    })?;

    if !url.has_host() {
        return Err(ConfigError::InvalidEnvVar(
            "FASHION_API_BASE_URL".to_string(),
            "must have a host".to_string(),
        ));
    }

    let api_base = url.as_str().trim_end_matches('/').to_string();
    let origin = url.origin().ascii_serialization();
    Ok((api_base, origin))
}

/// Parse an optional variable, falling back to a default when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
