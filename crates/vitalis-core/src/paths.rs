//! Standard paths used by Vitalis tools

use std::path::{Path, PathBuf};

/// Standard Vitalis paths
pub struct Paths {
    /// Data directory (~/.local/share/vitalis)
    pub data: PathBuf,
    /// Config directory (~/.config/vitalis)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("vitalis");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("vitalis");

        Self { data, config }
    }

    /// Use `data` instead of the platform data directory
    pub fn with_data_dir(mut self, data: &Path) -> Self {
        self.data = data.to_path_buf();
        self
    }

    /// Path to the YAML config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.yaml")
    }

    /// Get the state directory for a tool
    pub fn state(&self, tool: &str) -> PathBuf {
        self.data.join(tool)
    }
}
