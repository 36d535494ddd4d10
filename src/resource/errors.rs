//! Error types for resource rendering.
//!
//! Rules declared on a blueprint return `Result<_, RenderError>`, and any
//! error they produce reaches the caller of
//! [`Resource::render`](crate::resource::Resource::render) unchanged. The
//! engine adds errors of its own only for related-blueprint resolution and
//! for context or field lookups made through a
//! [`Scope`](crate::resource::Scope).
//!
//! # Example
//!
//! ```rust
//! use jsonapi_serializable::RenderError;
//!
//! let error = RenderError::Resolution {
//!     expected: "Api::SerializableUser".to_string(),
//! };
//! assert!(error.to_string().contains("Api::SerializableUser"));
//! ```

use thiserror::Error;

use crate::error::ConfigError;

/// A boxed error raised by a rule.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for rendering resources.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No blueprint could be found for a convention-based relationship.
    ///
    /// Raised while rendering, when a `has_one`/`has_many` relationship
    /// declared without an explicit blueprint evaluates its data.
    #[error("Cannot resolve related blueprint '{expected}'. Register a blueprint under this name in the BlueprintRegistry carried by the render context.")]
    Resolution {
        /// The conventional blueprint name that was looked up.
        expected: String,
    },

    /// A required context value is absent or has another type.
    #[error("Context value '{key}' is missing or is not of the requested type")]
    MissingContext {
        /// The context key that was requested.
        key: String,
    },

    /// The serialized model has no field with the requested name.
    #[error("Model has no field '{field}' in its serialized form")]
    UnknownField {
        /// The field that was requested.
        field: String,
    },

    /// A model's declared naming metadata is invalid.
    ///
    /// Raised while resolving a related blueprint by convention, when
    /// [`ResourceModel::NAMESPACE`](crate::ResourceModel::NAMESPACE) is not
    /// a valid namespace.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A rule's value could not be converted to JSON.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// A rule failed with its own error.
    #[error(transparent)]
    Computation(BoxError),
}

impl RenderError {
    /// Wraps an arbitrary rule error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use jsonapi_serializable::RenderError;
    ///
    /// let error = RenderError::computation("author lookup failed");
    /// assert_eq!(error.to_string(), "author lookup failed");
    /// ```
    pub fn computation<E: Into<BoxError>>(error: E) -> Self {
        Self::Computation(error.into())
    }
}

// Verify RenderError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RenderError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct LookupFailed;

    impl std::fmt::Display for LookupFailed {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("lookup failed")
        }
    }

    impl std::error::Error for LookupFailed {}

    #[test]
    fn test_resolution_error_names_expected_blueprint() {
        let error = RenderError::Resolution {
            expected: "V1::SerializablePost".to_string(),
        };
        let message = error.to_string();

        assert!(message.contains("V1::SerializablePost"));
        assert!(message.contains("BlueprintRegistry"));
    }

    #[test]
    fn test_missing_context_error_message() {
        let error = RenderError::MissingContext {
            key: "url_helper".to_string(),
        };
        assert!(error.to_string().contains("url_helper"));
    }

    #[test]
    fn test_computation_error_is_transparent() {
        let error = RenderError::computation(LookupFailed);

        assert_eq!(error.to_string(), "lookup failed");
        assert!(matches!(error, RenderError::Computation(ref inner) if inner.is::<LookupFailed>()));
    }

    #[test]
    fn test_from_serde_json_error_conversion() {
        let json_error = serde_json::from_str::<u32>("not json").unwrap_err();
        let error: RenderError = json_error.into();

        assert!(matches!(error, RenderError::Serialization(_)));
        assert!(error.to_string().contains("expected"));
    }
}
