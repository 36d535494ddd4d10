//! Configuration error types.
//!
//! This module contains the error type returned while declaring blueprints
//! and building configuration values. Errors raised while rendering live in
//! [`crate::resource::RenderError`].
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_serializable::{ConfigError, Namespace};
//!
//! let result = Namespace::new("");
//! assert!(matches!(result, Err(ConfigError::InvalidNamespace { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while declaring blueprints or configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Blueprint name cannot be empty.
    #[error("Blueprint name cannot be empty. Please provide the name used as the default resource type.")]
    EmptyBlueprintName,

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected an identifier segment such as 'V1' or 'V2Beta'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Namespace is invalid.
    #[error("Invalid namespace '{namespace}'. Expected identifier segments joined by '::' (e.g., 'Api::Admin').")]
    InvalidNamespace {
        /// The invalid namespace that was provided.
        namespace: String,
    },

    /// Naming separator is invalid.
    #[error("Invalid separator '{separator}'. The separator between blueprint name segments cannot be empty.")]
    InvalidSeparator {
        /// The invalid separator that was provided.
        separator: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
