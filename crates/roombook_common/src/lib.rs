// --- File: crates/roombook_common/src/lib.rs ---

pub mod error; // Error handling
pub mod features; // Runtime feature checks
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, timeout_error, HttpStatusCode, RoombookError,
};

// Re-export HTTP utilities for easier access
pub use http::{client::create_client, IntoHttpResponse};

// Re-export logging utilities for easier access
pub use logging::{init, init_from_config, init_with_level, log_error};

// Re-export feature flag handling utilities for easier access
pub use features::{is_auto_release_enabled, is_feature_enabled};
