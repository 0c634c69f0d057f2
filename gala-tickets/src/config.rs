//! Service configuration for gala-tickets
//!
//! Merges command-line values (which clap already backs with environment
//! variables) over the TOML config file, over compiled defaults.

use gala_common::config::{CompiledDefaults, RootFolderInitializer, RootFolderResolver, TomlConfig};
use std::path::PathBuf;
use tracing::info;

/// Values supplied on the command line or through their environment variables
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub root_folder: Option<PathBuf>,
    pub template_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
}

/// Fully resolved service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub port: u16,
    pub bind_address: String,
    pub template_path: PathBuf,
    pub database_path: PathBuf,
    pub log_level: String,
}

impl ServiceConfig {
    /// Resolve every setting through CLI/ENV → TOML → default
    pub fn resolve(cli: CliOverrides, toml: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();

        let root_folder = RootFolderResolver::new(cli.root_folder)
            .with_toml(toml)
            .resolve();
        let paths = RootFolderInitializer::new(root_folder.clone());

        Self {
            port: cli.port.or(toml.port).unwrap_or(defaults.port),
            bind_address: cli
                .bind_address
                .or_else(|| toml.bind_address.clone())
                .unwrap_or(defaults.bind_address),
            template_path: cli
                .template_path
                .or_else(|| toml.template_path.clone())
                .unwrap_or_else(|| paths.template_path()),
            database_path: cli
                .database_path
                .or_else(|| toml.database_path.clone())
                .unwrap_or_else(|| paths.database_path()),
            log_level: toml.logging.level.clone(),
            root_folder,
        }
    }

    /// `host:port` to bind the HTTP listener to
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn log_summary(&self) {
        info!("Root folder: {}", self.root_folder.display());
        info!("Database: {}", self.database_path.display());
        info!("Ticket template: {}", self.template_path.display());
        info!("Listen address: {}", self.listen_address());
    }
}
