//! Configuration for a smoke run.
//!
//! Resolution order, lowest to highest precedence:
//! 1. Built-in defaults (local service, canonical fixtures, no echo)
//! 2. YAML file named by `MEALMAX_SMOKE_CONFIG`, or `mealmax-smoke.yml` in the
//!    working directory when present
//! 3. `MEALMAX_BASE_URL` environment variable
//! 4. Command-line flags (applied by the binary)

use crate::fixtures::{FixtureSet, LEADERBOARD_SORT_KEYS};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "MEALMAX_SMOKE_CONFIG";

/// Environment variable overriding the service base URL.
pub const BASE_URL_ENV: &str = "MEALMAX_BASE_URL";

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "mealmax-smoke.yml";

/// Immutable settings shared by every step of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokeConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Print full response bodies after successful read-type steps.
    #[serde(default)]
    pub echo_json: bool,

    /// Data driven through the scripted run.
    #[serde(default)]
    pub fixtures: FixtureSet,

    /// Suppress all warnings (for CI environments).
    #[serde(default, rename = "_suppress_warnings")]
    pub suppress_warnings: bool,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            echo_json: false,
            fixtures: FixtureSet::default(),
            suppress_warnings: false,
        }
    }
}

impl SmokeConfig {
    /// Creates a default configuration pointed at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        debug!(path = %path_ref.display(), "Loading configuration from file");
        let content = std::fs::read_to_string(path_ref)?;
        let config: Self = serde_yaml::from_str(&content)?;
        debug!(
            base_url = %config.base_url,
            meals = config.fixtures.meals.len(),
            combatants = config.fixtures.combatants.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Resolves configuration from the process environment and working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok(), Path::new("."))
    }

    /// Resolves configuration using `env` for variable lookups and `cwd` for
    /// the default config file location.
    pub fn resolve(
        env: impl Fn(&str) -> Option<String>,
        cwd: &Path,
    ) -> Result<Self, ConfigError> {
        let mut config = match env(CONFIG_PATH_ENV) {
            Some(explicit) => {
                let path = PathBuf::from(explicit);
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                Self::from_file(&path)?
            }
            None => {
                let fallback = cwd.join(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(&fallback)?
                } else {
                    debug!(path = %fallback.display(), "No config file found, using defaults");
                    Self::default()
                }
            }
        };

        if let Some(base_url) = env(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(from = BASE_URL_ENV, value = %base_url, "Overriding base URL");
            config.base_url = base_url;
        }

        Ok(config)
    }

    /// Parses `base_url`, rejecting anything that cannot carry endpoint paths.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.base_url.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "expected an http or https URL".to_string(),
            });
        }

        // Endpoint paths and queries are appended per request; anything after
        // the path would leak into every call.
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "must not contain a query string or fragment".to_string(),
            });
        }

        Ok(url)
    }

    /// Validates the configuration and returns warnings.
    ///
    /// Errors here mean the run would send requests the service is certain
    /// to reject, so nothing should be sent at all.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.parsed_base_url()?;

        let fixtures = &self.fixtures;
        for meal in &fixtures.meals {
            if meal.meal.trim().is_empty() {
                return Err(ConfigError::InvalidFixture(
                    "meal name must not be empty".to_string(),
                ));
            }
            if !meal.price.is_finite() || meal.price <= 0.0 {
                return Err(ConfigError::InvalidFixture(format!(
                    "Invalid price for '{}': {}. Price must be a positive number.",
                    meal.meal, meal.price
                )));
            }
        }

        if !LEADERBOARD_SORT_KEYS.contains(&fixtures.leaderboard_sort.as_str()) {
            return Err(ConfigError::InvalidFixture(format!(
                "Invalid leaderboard sort '{}', expected one of: {}",
                fixtures.leaderboard_sort,
                LEADERBOARD_SORT_KEYS.join(", ")
            )));
        }

        let mut warnings = Vec::new();
        if self.suppress_warnings {
            return Ok(warnings);
        }

        if fixtures.combatants.len() != 2 {
            warnings.push(ConfigWarning::UnusualFixture {
                field: "fixtures.combatants".to_string(),
                message: format!(
                    "{} combatant(s) configured; a battle needs exactly two",
                    fixtures.combatants.len()
                ),
            });
        }

        if !fixtures.creates(&fixtures.lookup_name) {
            warnings.push(ConfigWarning::UnusualFixture {
                field: "fixtures.lookup_name".to_string(),
                message: format!(
                    "'{}' is not among the meals created by this run",
                    fixtures.lookup_name
                ),
            });
        }

        for name in &fixtures.combatants {
            if !fixtures.creates(name) {
                warnings.push(ConfigWarning::UnusualFixture {
                    field: "fixtures.combatants".to_string(),
                    message: format!("'{}' is not among the meals created by this run", name),
                });
            }
        }

        Ok(warnings)
    }
}

/// Configuration warnings emitted during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Fixture data is valid but unlikely to pass against a real service.
    UnusualFixture { field: String, message: String },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::UnusualFixture { field, message } => {
                write!(f, "Warning [{}]: {}", field, message)
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),
}
