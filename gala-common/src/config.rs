//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from, highest priority first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default
//!
//! A missing TOML file is never fatal: the service logs a warning and starts
//! with compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "GALA_ROOT_FOLDER";

/// SQLite database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "gala.db";

/// Background template file name inside the root folder
pub const TEMPLATE_FILE_NAME: &str = "ticket.png";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; unset fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database and, by default, the template
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Address the HTTP server binds to
    #[serde(default)]
    pub bind_address: Option<String>,

    /// Background template image (overrides `<root>/ticket.png`)
    #[serde(default)]
    pub template_path: Option<PathBuf>,

    /// SQLite database file (overrides `<root>/gala.db`)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level or full `EnvFilter` directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Built-in fallbacks used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub port: u16,
    pub bind_address: String,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            port: 3000,
            bind_address: "127.0.0.1".to_string(),
            log_level: default_log_level(),
        }
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/gala (or /var/lib/gala for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("gala"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/gala"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("gala"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/gala"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("gala"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\gala"))
    } else {
        PathBuf::from("./gala_data")
    }
}

/// Candidate config file locations, most specific first
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("gala").join("config.toml"));
    }
    if cfg!(unix) {
        paths.push(PathBuf::from("/etc/gala/config.toml"));
    }
    paths
}

/// Parse a TOML config file
///
/// Unlike discovery via [`load_config`], an explicitly named file that does
/// not exist is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from an explicit path, or discover one
///
/// Discovery never fails: missing files yield defaults and a malformed
/// discovered file is skipped with a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        return load_toml_config(path);
    }

    for candidate in default_config_paths() {
        if !candidate.exists() {
            continue;
        }
        match load_toml_config(&candidate) {
            Ok(config) => {
                debug!("Loaded config file {}", candidate.display());
                return Ok(config);
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", candidate.display(), e);
            }
        }
    }

    warn!("No config file found, using compiled defaults");
    Ok(TomlConfig::default())
}

/// Resolves the root folder through the CLI → ENV → TOML → default chain
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>) -> Self {
        Self {
            cli_arg,
            toml_root: None,
        }
    }

    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and derives the well-known paths inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder (and parents) if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            debug!("Created root folder {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    pub fn template_path(&self) -> PathBuf {
        self.root_folder.join(TEMPLATE_FILE_NAME)
    }
}
