//! Typed errors for catalog sessions
//!
//! The filter/sort/paginate pipeline itself never fails: empty facets,
//! inverted price ranges, unknown category ids and out-of-range pages all
//! resolve to well-defined output. Errors only arise at the edges, when
//! loading provider data or configuration.
//!
//! # Error Categories
//!
//! - [`CatalogError`]: top-level error returned by session operations
//! - [`ConfigError`]: configuration parsing and validation

use thiserror::Error;

/// The main error type of the crate
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog provider failed to deliver data
    #[error("catalog provider failed to load {collection}: {source}")]
    Provider {
        collection: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CatalogError {
    pub fn provider(collection: &'static str, source: anyhow::Error) -> Self {
        CatalogError::Provider { collection, source }
    }

    /// Error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Provider { .. } => "PROVIDER_ERROR",
            CatalogError::Config(e) => e.error_code(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration
    #[error("failed to parse config{}: {message}", file_suffix(.file))]
    Parse {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO_ERROR",
            ConfigError::Parse { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
        }
    }
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_deref()
        .map(|f| format!(" '{f}'"))
        .unwrap_or_default()
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
