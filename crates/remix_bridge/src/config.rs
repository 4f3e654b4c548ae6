//! Configuration system

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use serde::{Deserialize, Serialize};

use crate::loader::{DEFAULT_LIBRARY_FILE, DEFAULT_SEARCH_DIRS};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match ConfigFormat::of(path)? {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::of(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Flags forwarded in `remixapi_StartupInfo`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Skip the sRGB conversion of the final output
    pub disable_srgb_conversion_for_output: bool,
    /// Do not present through a Vulkan swapchain; the application fetches the
    /// output image itself
    pub force_no_vk_swapchain: bool,
    /// Start the renderer with its editor tooling enabled
    pub editor_mode_enabled: bool,
}

/// # Bridge Configuration
///
/// Where to find the renderer binary and how to start it.
///
/// ```toml
/// library_file_name = "d3d9.dll"
/// search_dirs = [".", "bin"]
///
/// [startup]
/// force_no_vk_swapchain = false
///
/// [config_variables]
/// "rtx.enableRaytracing" = "True"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// File name of the renderer binary
    pub library_file_name: String,
    /// Directories probed in order, relative to `search_root`
    pub search_dirs: Vec<PathBuf>,
    /// Base directory for the probe; the working directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_root: Option<PathBuf>,
    /// Startup flags
    pub startup: StartupConfig,
    /// Renderer options applied through `SetConfigVariable` right after startup
    pub config_variables: BTreeMap<String, String>,
}

impl BridgeConfig {
    /// Create a configuration for a renderer binary with the given file name
    pub fn new(library_file_name: impl Into<String>) -> Self {
        Self {
            library_file_name: library_file_name.into(),
            search_dirs: DEFAULT_SEARCH_DIRS.iter().map(PathBuf::from).collect(),
            search_root: None,
            startup: StartupConfig::default(),
            config_variables: BTreeMap::new(),
        }
    }

    /// Set the probed directories
    pub fn with_search_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Probe relative to `root` instead of the working directory
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_root = Some(root.into());
        self
    }

    /// Set startup flags
    pub fn with_startup(mut self, startup: StartupConfig) -> Self {
        self.startup = startup;
        self
    }

    /// Add a renderer option applied after startup
    pub fn with_config_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_variables.insert(key.into(), value.into());
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LIBRARY_FILE)
    }
}

impl Config for BridgeConfig {}
