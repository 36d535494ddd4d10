//! Configuration types for blueprint naming and lookup.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`NamingConvention`]: How conventional blueprint names are derived from
//!   a model's name, namespace and API version
//! - [`NamingConventionBuilder`]: A builder for constructing [`NamingConvention`]s
//! - [`Namespace`]: A validated model namespace newtype
//! - [`ApiVersion`]: A validated API version segment
//!
//! # Example
//!
//! ```rust
//! use jsonapi_serializable::{ApiVersion, Namespace, NamingConvention};
//!
//! let convention = NamingConvention::default();
//! let name = convention.blueprint_name(
//!     Some(&Namespace::new("Api").unwrap()),
//!     Some(&ApiVersion::new("V1").unwrap()),
//!     "User",
//! );
//! assert_eq!(name, "Api::V1::SerializableUser");
//! ```

mod newtypes;
mod version;

pub use newtypes::Namespace;
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Naming rules used to infer the blueprint that serializes a related model.
///
/// A conventional name is built from up to three segments: the model's
/// namespace, the API version of the declaring blueprint, and the model name
/// with [`prefix`](Self::prefix) prepended. Absent segments are skipped and
/// the rest are joined with [`separator`](Self::separator).
///
/// # Defaults
///
/// - `prefix`: `"Serializable"`
/// - `separator`: `"::"`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamingConvention {
    prefix: String,
    separator: String,
}

impl NamingConvention {
    /// The default prefix prepended to model names.
    pub const DEFAULT_PREFIX: &'static str = "Serializable";

    /// The default segment separator.
    pub const DEFAULT_SEPARATOR: &'static str = "::";

    /// Creates a new builder for constructing a `NamingConvention`.
    #[must_use]
    pub fn builder() -> NamingConventionBuilder {
        NamingConventionBuilder::new()
    }

    /// Returns the prefix prepended to model names.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the separator between name segments.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Builds the conventional blueprint name for a model.
    ///
    /// # Example
    ///
    /// ```rust
    /// use jsonapi_serializable::NamingConvention;
    ///
    /// let convention = NamingConvention::default();
    /// assert_eq!(convention.blueprint_name(None, None, "Post"), "SerializablePost");
    /// ```
    #[must_use]
    pub fn blueprint_name(
        &self,
        namespace: Option<&Namespace>,
        version: Option<&ApiVersion>,
        model_name: &str,
    ) -> String {
        let mut segments: Vec<String> = Vec::new();

        if let Some(namespace) = namespace {
            segments.extend(namespace.segments().map(ToString::to_string));
        }
        if let Some(version) = version {
            segments.push(version.to_string());
        }
        segments.push(format!("{}{}", self.prefix, model_name));

        segments
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            prefix: Self::DEFAULT_PREFIX.to_string(),
            separator: Self::DEFAULT_SEPARATOR.to_string(),
        }
    }
}

// Verify NamingConvention is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NamingConvention>();
};

/// Builder for constructing [`NamingConvention`] instances.
///
/// # Example
///
/// ```rust
/// use jsonapi_serializable::NamingConvention;
///
/// let convention = NamingConvention::builder()
///     .prefix("")
///     .separator(".")
///     .build()
///     .unwrap();
///
/// assert_eq!(convention.blueprint_name(None, None, "User"), "User");
/// ```
#[derive(Debug, Default)]
pub struct NamingConventionBuilder {
    prefix: Option<String>,
    separator: Option<String>,
}

impl NamingConventionBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix prepended to model names. May be empty.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the separator between name segments.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Builds the [`NamingConvention`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeparator`] if the separator was set
    /// to an empty string.
    pub fn build(self) -> Result<NamingConvention, ConfigError> {
        let separator = self
            .separator
            .unwrap_or_else(|| NamingConvention::DEFAULT_SEPARATOR.to_string());
        if separator.is_empty() {
            return Err(ConfigError::InvalidSeparator { separator });
        }

        Ok(NamingConvention {
            prefix: self
                .prefix
                .unwrap_or_else(|| NamingConvention::DEFAULT_PREFIX.to_string()),
            separator,
        })
    }
}
