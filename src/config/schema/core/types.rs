use crate::config::schema::{NotifyConfig, SiteConfig};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed at load, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Directory holding the config and the default store file
    #[serde(skip)]
    pub state_dir: PathBuf,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub notify: NotifyConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

// ── HTTP ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Default request timeout when a request does not set its own
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Sent on every request that does not carry its own `User-Agent`
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_ms() -> u64 {
    crate::http::DEFAULT_TIMEOUT_MS
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: None,
        }
    }
}

// ── Store ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON document backing the server host (`~` expanded).
    /// Defaults to `store.json` next to the config file.
    #[serde(default)]
    pub path: Option<String>,
    /// Key prefix for the in-memory backend
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    "checkin".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            namespace: default_namespace(),
        }
    }
}

// ── Orchestrator ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Pause between consecutive steps of one account
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
}

fn default_step_delay_ms() -> u64 {
    500
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let state_dir = home.join(".checkin");

        Self {
            config_path: state_dir.join("config.toml"),
            state_dir,
            http: HttpConfig::default(),
            store: StoreConfig::default(),
            notify: NotifyConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            sites: Vec::new(),
        }
    }
}

impl Config {
    /// Resolved path of the server store document.
    pub fn store_path(&self) -> PathBuf {
        match self.store.path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => PathBuf::from(shellexpand::tilde(path).as_ref()),
            _ => self.state_dir.join("store.json"),
        }
    }

    pub fn site(&self, name: &str) -> Option<&SiteConfig> {
        self.sites.iter().find(|s| s.name == name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_ms must be greater than 0".into(),
            ));
        }
        if self.store.namespace.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store.namespace must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for site in &self.sites {
            site.validate()?;
            if !seen.insert(site.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate site name: {}",
                    site.name
                )));
            }
        }
        Ok(())
    }
}
