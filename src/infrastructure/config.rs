use crate::domain::{config::TailConfig, error::{TailError, TailResult}};
use std::path::{Path, PathBuf};
use std::fs;
use tracing::debug;

const CONFIG_DIR: &str = ".serial-tail";
const CONFIG_FILE: &str = "config.toml";

/// Configuration manager
pub struct ConfigManager {
    global_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> Self {
        Self {
            global_config_path: Self::get_global_config_path(),
            project_config_path: Self::find_project_config_path(),
        }
    }

    /// Manager with explicit file locations
    pub fn with_paths(global_config_path: Option<PathBuf>, project_config_path: Option<PathBuf>) -> Self {
        Self {
            global_config_path,
            project_config_path,
        }
    }

    /// Load configuration from files.
    ///
    /// A project file replaces the global file, which replaces the defaults.
    pub fn load_config(&self) -> TailResult<TailConfig> {
        let candidates = [self.project_config_path.as_ref(), self.global_config_path.as_ref()];

        for path in candidates.into_iter().flatten() {
            if path.exists() {
                debug!("Loading configuration from {}", path.display());
                return self.load_config_from_path(path);
            }
        }

        Ok(TailConfig::default())
    }

    /// Global configuration path
    fn get_global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("serial-tail").join(CONFIG_FILE))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> TailResult<TailConfig> {
        let content = fs::read_to_string(path).map_err(|e| TailError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| TailError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Save configuration to specific path
    pub fn save_config_to_path(&self, path: &Path, config: &TailConfig) -> TailResult<()> {
        let content = toml::to_string_pretty(config).map_err(|e| TailError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| TailError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }

        fs::write(path, content).map_err(|e| TailError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Write a default configuration file, refusing to overwrite one
    pub fn init_config(&self, path: &Path) -> TailResult<()> {
        if path.exists() {
            return Err(TailError::Config {
                message: format!("Configuration already exists at {}", path.display()),
            });
        }

        self.save_config_to_path(path, &TailConfig::default())
    }

    /// Default project config location under `dir`
    pub fn project_config_path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Get the global config path
    pub fn get_global_config_path_ref(&self) -> Option<&PathBuf> {
        self.global_config_path.as_ref()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
