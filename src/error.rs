//! Error types for the curate pipeline
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Per-record coercion failures are not errors: they become missing values
//! and are handled inside the transform stage.

use thiserror::Error;

/// The main error type for the curate pipeline
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Failed to read source '{location}': {message}")]
    SourceRead { location: String, message: String },

    #[error("Failed to write destination '{location}': {message}")]
    Write { location: String, message: String },

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    // ============================================================================
    // Job Service Errors
    // ============================================================================
    /// Raised by the job service; displays the service message unchanged
    #[error("{message}")]
    JobService { message: String },

    /// Raised by the catalog service; displays the service message unchanged
    #[error("{message}")]
    Catalog { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a source read error
    pub fn source_read(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceRead {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a destination write error
    pub fn write(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a job service error
    pub fn job_service(message: impl Into<String>) -> Self {
        Self::JobService {
            message: message.into(),
        }
    }

    /// Create a catalog service error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Check if this error aborts a transform job
    pub fn is_fatal_for_transform(&self) -> bool {
        matches!(
            self,
            Error::SourceRead { .. }
                | Error::Write { .. }
                | Error::ObjectStore(_)
                | Error::Arrow(_)
                | Error::Parquet(_)
                | Error::Csv(_)
        )
    }
}

/// Result type alias for the curate pipeline
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::source_read("s3://bucket/raw/", "access denied");
        assert_eq!(
            err.to_string(),
            "Failed to read source 's3://bucket/raw/': access denied"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_service_errors_display_message_unchanged() {
        let err = Error::job_service("EntityNotFoundException: job not found");
        assert_eq!(err.to_string(), "EntityNotFoundException: job not found");

        let err = Error::catalog("CrawlerRunningException");
        assert_eq!(err.to_string(), "CrawlerRunningException");
    }

    #[test]
    fn test_is_fatal_for_transform() {
        assert!(Error::source_read("raw", "missing").is_fatal_for_transform());
        assert!(Error::write("curated", "denied").is_fatal_for_transform());
        assert!(!Error::job_service("boom").is_fatal_for_transform());
        assert!(!Error::config("bad").is_fatal_for_transform());
    }
}
