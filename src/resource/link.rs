//! JSON:API link values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A link as it appears in a `links` object.
///
/// A link is either a bare URL or an object with an `href` and optional
/// `meta`.
///
/// # Example
///
/// ```rust
/// use jsonapi_serializable::Link;
/// use serde_json::json;
///
/// let plain = Link::from("https://api.example.com/users/1");
/// assert_eq!(serde_json::to_value(&plain).unwrap(), json!("https://api.example.com/users/1"));
///
/// let with_meta = Link::with_meta("https://api.example.com/users/1", json!({ "is_self": true }));
/// assert_eq!(
///     serde_json::to_value(&with_meta).unwrap(),
///     json!({ "href": "https://api.example.com/users/1", "meta": { "is_self": true } })
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Link {
    /// A bare URL.
    Url(String),
    /// A link object.
    Object {
        /// The link's URL.
        href: String,
        /// Non-standard meta information about the link.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<Value>,
    },
}

impl Link {
    /// Creates a link object carrying meta information.
    #[must_use]
    pub fn with_meta(href: impl Into<String>, meta: Value) -> Self {
        Self::Object {
            href: href.into(),
            meta: Some(meta),
        }
    }

    /// Returns the link's URL.
    #[must_use]
    pub fn href(&self) -> &str {
        match self {
            Self::Url(href) | Self::Object { href, .. } => href,
        }
    }

    /// Returns the link's meta information, if any.
    #[must_use]
    pub const fn meta(&self) -> Option<&Value> {
        match self {
            Self::Url(_) => None,
            Self::Object { meta, .. } => meta.as_ref(),
        }
    }
}

impl From<String> for Link {
    fn from(href: String) -> Self {
        Self::Url(href)
    }
}

impl From<&str> for Link {
    fn from(href: &str) -> Self {
        Self::Url(href.to_string())
    }
}
