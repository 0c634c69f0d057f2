//! Shared error type for the Gala crates
//!
//! Storage and configuration failures surface through this type. Ticket
//! pipeline failures have their own error in `gala-tickets` and wrap this one
//! when a store operation is involved.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by store and configuration code
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// SQLite query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure (root folder creation, config reads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML config file present but not parseable
    #[error("Invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Backing store refused or could not complete an operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
