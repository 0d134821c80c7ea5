use std::fmt;
use thiserror::Error;

/// The base error type shared by all roombook crates.
///
/// Crate-specific errors convert into this type with `From` so handlers can
/// turn them into the common JSON error envelope.
#[derive(Error, Debug)]
pub enum RoombookError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error reported by, or about, an external service
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// An outbound call did not complete in time
    #[error("Timeout: {0}")]
    TimeoutError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for RoombookError {
    fn status_code(&self) -> u16 {
        match self {
            RoombookError::ConfigError(_) => 500,
            RoombookError::ExternalServiceError { .. } => 502,
            RoombookError::TimeoutError(_) => 504,
        }
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> RoombookError {
    RoombookError::ConfigError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> RoombookError {
    RoombookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn timeout_error<T: fmt::Display>(message: T) -> RoombookError {
    RoombookError::TimeoutError(message.to_string())
}
