//! Vitalis configuration
//!
//! Configuration file: ~/.config/vitalis/config.yaml
//!
//! ```yaml
//! timer:
//!   sets: 3
//!   work_seconds: 45
//!   rest_seconds: 15
//! cycle:
//!   default_length: 28
//! assist:                    # optional, text generation
//!   api_key: ...             # or GEMINI_API_KEY
//!   model: gemini-2.5-flash
//! data_dir: /path/to/data   # optional
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::gemini::{API_BASE_URL, DEFAULT_MODEL};
use crate::paths::Paths;

/// Global Vitalis configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VitalisConfig {
    /// Default timer settings for new workouts
    #[serde(default)]
    pub timer: TimerDefaults,

    /// Cycle tracker settings
    #[serde(default)]
    pub cycle: CycleDefaults,

    /// Text generation service
    #[serde(default)]
    pub assist: AssistConfig,

    /// Override for the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Default sets and durations offered when creating a workout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerDefaults {
    pub sets: u32,
    pub work_seconds: u32,
    pub rest_seconds: u32,
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            sets: 3,
            work_seconds: 45,
            rest_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleDefaults {
    /// Average cycle length used until the user sets one
    pub default_length: u32,
}

impl Default for CycleDefaults {
    fn default() -> Self {
        Self { default_length: 28 }
    }
}

/// Text generation service settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssistConfig {
    /// API key; `GEMINI_API_KEY` is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    /// API root, without the `/models/...` suffix
    pub endpoint: String,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: API_BASE_URL.to_string(),
        }
    }
}

impl VitalisConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Paths::new().config_file())
    }

    /// Load configuration from a specific path, defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))
    }

    /// Resolve the paths to use, honoring `data_dir`
    pub fn paths(&self) -> Paths {
        match &self.data_dir {
            Some(dir) => Paths::new().with_data_dir(dir),
            None => Paths::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VitalisConfig::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, VitalisConfig::default());
        assert_eq!(config.timer.sets, 3);
        assert_eq!(config.cycle.default_length, 28);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "cycle:\n  default_length: 30\n").unwrap();

        let config = VitalisConfig::load_from(&path).unwrap();
        assert_eq!(config.cycle.default_length, 30);
        assert_eq!(config.timer, TimerDefaults::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = VitalisConfig::default();
        config.timer.work_seconds = 30;
        config.data_dir = Some(dir.path().join("data"));
        config.save_to(&path).unwrap();

        let loaded = VitalisConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.paths().data, dir.path().join("data"));
    }

    #[test]
    fn test_assist_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "assist:\n  api_key: abc\n").unwrap();

        let config = VitalisConfig::load_from(&path).unwrap();
        assert_eq!(config.assist.api_key.as_deref(), Some("abc"));
        assert_eq!(config.assist.model, DEFAULT_MODEL);
        assert_eq!(config.assist.endpoint, API_BASE_URL);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "timer: [not, a, map").unwrap();
        assert!(VitalisConfig::load_from(&path).is_err());
    }
}
