//! # Gala Common Library
//!
//! Shared code for the Gala ticket services including:
//! - Common error type
//! - Configuration loading and root folder resolution
//! - Database initialization
//! - Timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
