//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated model namespace, such as `Api` or `Api::Admin`.
///
/// Namespaces are made of identifier segments joined by `::`. They mirror
/// the module path a model is grouped under and become the leading part of
/// conventional blueprint names.
///
/// # Example
///
/// ```rust
/// use jsonapi_serializable::Namespace;
///
/// let namespace = Namespace::new("Api::Admin").unwrap();
/// assert_eq!(namespace.segments().collect::<Vec<_>>(), vec!["Api", "Admin"]);
///
/// assert!(Namespace::new("Api::").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// The separator between namespace segments.
    pub const SEPARATOR: &'static str = "::";

    /// Creates a new validated namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNamespace`] if the namespace is empty or
    /// any segment is not an identifier.
    pub fn new(namespace: impl Into<String>) -> Result<Self, ConfigError> {
        let namespace = namespace.into();
        let namespace = namespace.trim().to_string();

        let valid = !namespace.is_empty()
            && namespace
                .split(Self::SEPARATOR)
                .all(Self::is_valid_segment);

        if !valid {
            return Err(ConfigError::InvalidNamespace { namespace });
        }

        Ok(Self(namespace))
    }

    /// Returns the individual segments of the namespace.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(Self::SEPARATOR)
    }

    fn is_valid_segment(segment: &str) -> bool {
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Namespace {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Namespace {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
