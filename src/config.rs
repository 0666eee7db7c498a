//! Configuration file and environment support

use crate::routing::RouterConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// On-disk configuration (`config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub router: RouterConfig,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Access {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;
        let access = |e| ConfigError::Access {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(access)?;
        }
        std::fs::write(path, contents).map_err(access)
    }
}

/// Default config location, `~/.config/handyroute/config.toml` on Linux
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("handyroute").join("config.toml"))
}

/// Everything needed to build a router
#[derive(Debug, Clone)]
pub struct Settings {
    pub router: RouterConfig,
    pub api_key: String,
}

impl Settings {
    /// Load from the process environment and an optional config file.
    ///
    /// An explicit `path` must exist; the default location is only read when
    /// present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// Same as [`Settings::load`] with a custom environment lookup
    pub fn load_with<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(path) => ConfigFile::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(default) => ConfigFile::from_file(default)?,
                None => ConfigFile::default(),
            },
        };

        let mut router = file.router;
        apply_env_overrides(&mut router, &env);

        let api_key = env(API_KEY_VAR)
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self { router, api_key })
    }
}

/// Environment variables take precedence over the file
fn apply_env_overrides<F>(router: &mut RouterConfig, env: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env("BACKEND_URL") {
        router.backend_url = url;
    }
    if let Some(model) = env("GEMINI_MODEL") {
        router.model = model;
    }
    if let Some(endpoint) = env("GEMINI_ENDPOINT") {
        router.gemini_endpoint = endpoint;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("Cannot access config file {path}: {source}")]
    Access {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
