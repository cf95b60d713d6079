//! Backend location and route configuration.

use std::env;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_STORES_PATH: &str = "/store-profile";
const DEFAULT_COMMENTS_PATH: &str = "/comments-store";
const DEFAULT_CATALOGUE_PATH: &str = "/catalogue";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Where the backend lives and the route prefix of each resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub stores_path: String,
    pub comments_path: String,
    pub catalogue_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stores_path: DEFAULT_STORES_PATH.to_string(),
            comments_path: DEFAULT_COMMENTS_PATH.to_string(),
            catalogue_path: DEFAULT_CATALOGUE_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load from `FOODSTORE_*` environment variables, falling back to the
    /// defaults for any that are unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let load = |key: &str, default: &str| {
            lookup(key).unwrap_or_else(|| {
                info!("{key} not set, using default: {default}");
                default.to_string()
            })
        };

        let config = Self {
            base_url: load("FOODSTORE_API_URL", DEFAULT_BASE_URL),
            stores_path: load("FOODSTORE_STORES_PATH", DEFAULT_STORES_PATH),
            comments_path: load("FOODSTORE_COMMENTS_PATH", DEFAULT_COMMENTS_PATH),
            catalogue_path: load("FOODSTORE_CATALOGUE_PATH", DEFAULT_CATALOGUE_PATH),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Empty("base_url"));
        }
        Ok(())
    }

    /// Join the base URL with a route, with exactly one slash between them.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn stores_url(&self) -> String {
        self.url(&self.stores_path)
    }

    pub fn comments_url(&self) -> String {
        self.url(&self.comments_path)
    }

    pub fn catalogue_url(&self) -> String {
        self.url(&self.catalogue_path)
    }
}
