use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::AetherError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_STORE_DIR: &str = ".aether/sessions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Config file read when `AETHER_CONFIG` is unset.
const DEFAULT_CONFIG_FILE: &str = "aether.toml";

/// Credentials and endpoint for the completion API.
#[derive(Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// None when no API key is configured; model-backed tools then report an error.
    pub gemini: Option<GeminiConfig>,
    pub model: String,
    pub store_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini: None,
            model: DEFAULT_MODEL.to_string(),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Optional `aether.toml` contents. Every key is optional; the API key is
/// only read from the environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    base_url: Option<String>,
    model: Option<String>,
    store_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
}

impl Config {
    /// Defaults, then the TOML config file, then environment overrides.
    /// Never fails: an unreadable or invalid file is logged and skipped.
    pub fn load() -> Self {
        let path = env::var("AETHER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let file = read_config_file(&path);

        match Self::from_sources(file.as_deref(), |key| env::var(key).ok()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring config file {}: {e}", path.display());
                Self::from_sources(None, |key| env::var(key).ok()).unwrap_or_default()
            }
        }
    }

    /// Build a config from TOML text and an environment lookup.
    pub fn from_sources(
        file: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AetherError> {
        let file: FileConfig = match file {
            Some(text) => {
                toml::from_str(text).map_err(|e| AetherError::Config(e.to_string()))?
            }
            None => FileConfig::default(),
        };
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = lookup("AETHER_GEMINI_BASE_URL")
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let gemini = match lookup("GEMINI_API_KEY") {
            Some(api_key) => Some(GeminiConfig { base_url, api_key }),
            None => {
                tracing::warn!("GEMINI_API_KEY not set, model-backed tools unavailable");
                None
            }
        };

        let model = lookup("AETHER_MODEL")
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let store_dir = lookup("AETHER_STORE_DIR")
            .map(PathBuf::from)
            .or(file.store_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));

        let timeout_secs = match lookup("AETHER_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AetherError::Config(format!("AETHER_TIMEOUT_SECS={raw}: {e}"))
            })?,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(AetherError::Config("timeout must be at least 1 second".to_string()));
        }

        Ok(Self {
            gemini,
            model,
            store_dir,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn read_config_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            tracing::info!("loaded config from {}", path.display());
            Some(text)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!("cannot read config file {}: {e}", path.display());
            None
        }
    }
}
