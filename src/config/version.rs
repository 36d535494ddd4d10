//! API version segments used in blueprint names.
//!
//! This module provides the [`ApiVersion`] newtype. A blueprint may declare
//! the API version it belongs to; the version then becomes one segment of
//! the conventional name used to look up related blueprints
//! (e.g. `Api::V2::SerializableUser`).

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An API version segment such as `V1` or `V2Beta`.
///
/// The first character is normalized to uppercase, so `"v1"` and `"V1"`
/// parse to the same version.
///
/// # Example
///
/// ```rust
/// use jsonapi_serializable::ApiVersion;
///
/// let version: ApiVersion = "v2".parse().unwrap();
/// assert_eq!(version.as_ref(), "V2");
/// assert_eq!(version.number(), Some(2));
///
/// assert!("2-beta".parse::<ApiVersion>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// Creates a new validated API version.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiVersion`] if the value is empty,
    /// does not start with a letter, or contains characters other than
    /// ASCII letters, digits and underscores.
    pub fn new(version: impl Into<String>) -> Result<Self, ConfigError> {
        let version = version.into();
        let trimmed = version.trim();

        if !Self::is_valid_segment(trimmed) {
            return Err(ConfigError::InvalidApiVersion {
                version: trimmed.to_string(),
            });
        }

        let mut chars = trimmed.chars();
        let normalized = chars.next().map_or_else(String::new, |first| {
            first.to_ascii_uppercase().to_string() + chars.as_str()
        });

        Ok(Self(normalized))
    }

    /// Returns the leading version number, if the segment carries one.
    ///
    /// `V2` and `V2Beta` both yield `Some(2)`; `Unstable` yields `None`.
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        let digits: String = self
            .0
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }

    fn is_valid_segment(s: &str) -> bool {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl AsRef<str> for ApiVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
