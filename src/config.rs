use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_VAR: &str = "TWEETFEED_ENV";

const DEFAULT_DEVELOPMENT_URL: &str = "http://localhost:5000/api";
const DEFAULT_PRODUCTION_URL: &str = "https://weathergpt.us/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// `"development"` selects the local origin; every other mode is production.
    pub fn from_mode(mode: &str) -> Self {
        if mode.trim().eq_ignore_ascii_case("development") {
            Environment::Development
        } else {
            Environment::Production
        }
    }
}

/// Whether the local page counter is sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageParam {
    /// Every page re-fetches `/tweets/{topic}`; the server picks a fresh batch.
    #[default]
    Ignore,
    /// Append `?page=N`.
    Query,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_development_url")]
    pub development: String,
    #[serde(default = "default_production_url")]
    pub production: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            development: default_development_url(),
            production: default_production_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Raw mode selector; see [`Environment::from_mode`].
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub page_param: PageParam,
    /// Rows before the end of the feed at which the sentinel counts as visible.
    #[serde(default)]
    pub prefetch_rows: usize,
    #[serde(default)]
    pub endpoints: Endpoints,
    /// Overrides the profile endpoints entirely.
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_development_url() -> String {
    DEFAULT_DEVELOPMENT_URL.to_string()
}

fn default_production_url() -> String {
    DEFAULT_PRODUCTION_URL.to_string()
}

fn default_topic() -> String {
    "random".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: None,
            topic: default_topic(),
            timeout_secs: default_timeout_secs(),
            page_param: PageParam::default(),
            prefetch_rows: 0,
            endpoints: Endpoints::default(),
            base_url: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tweetfeed").join("config.toml"))
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config file {}", path.display()))?;

        Ok(config)
    }

    /// Resolves the profile from, in order: the explicit `mode` (CLI), the
    /// `TWEETFEED_ENV` value passed as `env_mode`, then the file's `environment`.
    pub fn environment(&self, mode: Option<&str>, env_mode: Option<&str>) -> Environment {
        mode.or(env_mode)
            .or(self.environment.as_deref())
            .map(Environment::from_mode)
            .unwrap_or_default()
    }

    pub fn base_url(&self, environment: Environment) -> &str {
        if let Some(url) = &self.base_url {
            return url;
        }
        match environment {
            Environment::Development => &self.endpoints.development,
            Environment::Production => &self.endpoints.production,
        }
    }

    /// A zero timeout would fail every load instantly.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
