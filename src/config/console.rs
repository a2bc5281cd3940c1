use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:5290";
pub const DEFAULT_TOKEN_SLOT: &str = "token";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const PROJECT_FILE: &str = "roster.toml";
const CONFIG_DIR: &str = ".roster";

/// Console configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL of the student API (no trailing `/api`)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Path of the SQLite file holding the session token
    #[serde(default)]
    pub token_db: Option<PathBuf>,

    /// Name of the storage slot the token lives in
    #[serde(default = "default_token_slot")]
    pub token_slot: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_token_slot() -> String {
    DEFAULT_TOKEN_SLOT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_db: None,
            token_slot: default_token_slot(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration with precedence: env > ./roster.toml > ~/.roster/config.toml > defaults
    pub fn load() -> Result<Self> {
        let global = home_dir().map(|h| h.join(CONFIG_DIR).join("config.toml"));
        Self::load_from(
            Some(Path::new(PROJECT_FILE)),
            global.as_deref(),
            |key| std::env::var(key).ok(),
        )
    }

    /// Load from explicit file locations and an environment lookup.
    ///
    /// The first file that exists wins; a missing file is skipped, a malformed one is an error.
    pub fn load_from(
        project: Option<&Path>,
        global: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        for path in [project, global].into_iter().flatten() {
            if path.is_file() {
                config = Self::from_file(path)?;
                debug!(path = %path.display(), "loaded configuration file");
                break;
            }
        }

        if let Some(url) = env("ROSTER_API_URL").filter(|v| !v.is_empty()) {
            config.api_url = url;
        }
        if let Some(db) = env("ROSTER_TOKEN_DB").filter(|v| !v.is_empty()) {
            config.token_db = Some(PathBuf::from(db));
        }

        Ok(config)
    }

    /// Parse a single TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Token database location, falling back to ~/.roster/session.db
    pub fn token_db_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.token_db {
            return Ok(path.clone());
        }
        let home = home_dir().context("HOME environment variable not set")?;
        Ok(home.join(CONFIG_DIR).join("session.db"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
