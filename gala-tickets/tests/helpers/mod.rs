//! Test Helper Utilities
//!
//! Shared utilities for testing gala-tickets

#![allow(dead_code)]

pub mod fixtures;
pub mod http;
pub mod stores;

// Re-export commonly used items
#[allow(unused_imports)]
pub use fixtures::{
    seed_raw_codes, test_app, test_app_with_store, test_app_without_template, write_template,
    TestApp, TEMPLATE_HEIGHT, TEMPLATE_WIDTH,
};
#[allow(unused_imports)]
pub use http::{body_bytes, body_json, get, post_form, post_json, zip_members};
#[allow(unused_imports)]
pub use stores::{FailingClearStore, FailingInsertStore};
