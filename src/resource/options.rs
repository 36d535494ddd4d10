//! Per-render selection of fields and included relationships.

use std::collections::BTreeSet;

/// Options for a single [`render`](crate::Serializable::render) call.
///
/// - `fields`: when set, only attributes and relationships with these names
///   are rendered. Unknown names are ignored.
/// - `include`: relationships whose related resources are rendered in full
///   instead of as links or identifiers.
///
/// # Example
///
/// ```rust
/// use jsonapi_serializable::RenderOptions;
///
/// let options = RenderOptions::new()
///     .fields(["name", "author"])
///     .include(["author"]);
///
/// assert!(options.selects("name"));
/// assert!(!options.selects("email"));
/// assert!(options.includes("author"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Names of the attributes and relationships to render, or `None` for
    /// all of them.
    pub fields: Option<BTreeSet<String>>,
    /// Names of the relationships to render in full.
    pub include: BTreeSet<String>,
}

impl RenderOptions {
    /// Creates options that render every field and include nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts rendering to the given field names.
    ///
    /// Calling this more than once widens the selection.
    #[must_use]
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .get_or_insert_with(BTreeSet::new)
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds relationships to render in full.
    #[must_use]
    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(names.into_iter().map(Into::into));
        self
    }

    /// Returns `true` if the field `name` should be rendered.
    #[must_use]
    pub fn selects(&self, name: &str) -> bool {
        self.fields
            .as_ref()
            .map_or(true, |fields| fields.contains(name))
    }

    /// Returns `true` if the relationship `name` should be rendered in full.
    #[must_use]
    pub fn includes(&self, name: &str) -> bool {
        self.include.contains(name)
    }
}
