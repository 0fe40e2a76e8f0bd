use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Markdown file holding the prompts. Unset until the user picks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts_path: Option<PathBuf>,
}

impl Config {
    pub fn with_prompts_path(path: impl Into<PathBuf>) -> Self {
        Self {
            prompts_path: Some(path.into()),
        }
    }

    /// Like [`Config::with_prompts_path`], expanding `~` and `$VAR` the same
    /// way paths loaded from the config file are. Falls back to the literal
    /// path when expansion fails.
    pub fn with_expanded_prompts_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::with_prompts_path(Self::expand_path(&path).unwrap_or(path))
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded prompts path
        config.prompts_path = config
            .prompts_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    /// Updates the prompts path and persists the whole config.
    ///
    /// `self` is only changed once the new config has been written.
    pub fn set_prompts_path<P: AsRef<Path>>(
        &mut self,
        prompts_path: PathBuf,
        config_path: P,
    ) -> anyhow::Result<()> {
        let mut next = self.clone();
        next.prompts_path = Some(prompts_path);
        next.save_to_path(config_path)?;
        *self = next;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/prompt-reader");
        PathBuf::from(config_dir.as_ref())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn log_path() -> PathBuf {
        Self::config_dir().join("prompt-reader.log")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
