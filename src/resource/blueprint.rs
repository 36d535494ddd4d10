//! Blueprints: the declared rules of a resource.
//!
//! A [`Blueprint`] describes how one kind of model is turned into a JSON:API
//! resource object. It is assembled with a [`BlueprintBuilder`] and is
//! immutable afterwards, so it can be shared (usually behind an [`Arc`])
//! between any number of [`Resource`](crate::resource::Resource) instances.
//!
//! # Inheritance
//!
//! [`Blueprint::extend`] starts a new builder from copies of every rule
//! table of an existing blueprint. Rules added or overridden on the new
//! builder never affect the original.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_serializable::Blueprint;
//!
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let users = Blueprint::<User>::builder("users")
//!     .id(|scope| Ok(scope.model().id))
//!     .attribute("name", |scope| Ok(scope.model().name.clone()))
//!     .build()
//!     .unwrap();
//!
//! let admins = users
//!     .extend("admins")
//!     .attribute("admin", |_| Ok(true))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(users.attribute_names().collect::<Vec<_>>(), vec!["name"]);
//! assert_eq!(admins.attribute_names().collect::<Vec<_>>(), vec!["name", "admin"]);
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiVersion;
use crate::error::ConfigError;
use crate::resource::relationship::{RelationshipBuilder, RelationshipDecl};
use crate::resource::{Link, RenderError, Scope};

pub(crate) type StringRule<M> =
    Arc<dyn Fn(&Scope<'_, M>) -> Result<String, RenderError> + Send + Sync>;
pub(crate) type ValueRule<M> =
    Arc<dyn Fn(&Scope<'_, M>) -> Result<Value, RenderError> + Send + Sync>;
pub(crate) type LinkRule<M> = Arc<dyn Fn(&Scope<'_, M>) -> Result<Link, RenderError> + Send + Sync>;

pub(crate) fn string_rule<M, F>(rule: F) -> StringRule<M>
where
    F: Fn(&Scope<'_, M>) -> Result<String, RenderError> + Send + Sync + 'static,
{
    Arc::new(rule)
}

pub(crate) fn value_rule<M, F>(rule: F) -> ValueRule<M>
where
    F: Fn(&Scope<'_, M>) -> Result<Value, RenderError> + Send + Sync + 'static,
{
    Arc::new(rule)
}

pub(crate) fn link_rule<M, F>(rule: F) -> LinkRule<M>
where
    F: Fn(&Scope<'_, M>) -> Result<Link, RenderError> + Send + Sync + 'static,
{
    Arc::new(rule)
}

/// How the `type` member is produced.
pub(crate) enum TypeRule<M> {
    Fixed(String),
    Computed(StringRule<M>),
}

impl<M> Clone for TypeRule<M> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(value) => Self::Fixed(value.clone()),
            Self::Computed(rule) => Self::Computed(Arc::clone(rule)),
        }
    }
}

/// How a `meta` member is produced.
pub(crate) enum MetaRule<M> {
    Fixed(Value),
    Computed(ValueRule<M>),
}

impl<M> MetaRule<M> {
    pub(crate) fn evaluate(&self, scope: &Scope<'_, M>) -> Result<Value, RenderError> {
        match self {
            Self::Fixed(value) => Ok(value.clone()),
            Self::Computed(rule) => rule(scope),
        }
    }
}

impl<M> Clone for MetaRule<M> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(value) => Self::Fixed(value.clone()),
            Self::Computed(rule) => Self::Computed(Arc::clone(rule)),
        }
    }
}

/// Evaluates a table of link rules in declaration order.
pub(crate) fn evaluate_links<M>(
    links: &IndexMap<String, LinkRule<M>>,
    scope: &Scope<'_, M>,
) -> Result<serde_json::Map<String, Value>, RenderError> {
    let mut evaluated = serde_json::Map::new();
    for (name, rule) in links {
        let link = rule(scope)?;
        evaluated.insert(name.clone(), serde_json::to_value(link)?);
    }
    Ok(evaluated)
}

/// The declared rules used to render one kind of model.
///
/// Blueprints are built with [`Blueprint::builder`], [`Blueprint::extend`]
/// or [`Blueprint::for_model`](crate::model) and cannot be changed once
/// built.
pub struct Blueprint<M> {
    pub(crate) name: String,
    pub(crate) id: StringRule<M>,
    pub(crate) type_rule: Option<TypeRule<M>>,
    pub(crate) meta: Option<MetaRule<M>>,
    pub(crate) attributes: IndexMap<String, ValueRule<M>>,
    pub(crate) relationships: IndexMap<String, Arc<RelationshipDecl<M>>>,
    pub(crate) links: IndexMap<String, LinkRule<M>>,
    pub(crate) api_version: Option<ApiVersion>,
}

impl<M: 'static> Blueprint<M> {
    /// Starts a new blueprint.
    ///
    /// `name` is the blueprint's own name; it is used as the resource type
    /// unless a type is declared.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> BlueprintBuilder<M> {
        BlueprintBuilder::new(name)
    }

    /// Starts a new blueprint derived from this one.
    ///
    /// The new builder begins with independent copies of this blueprint's
    /// id, type and meta rules, API version, and its attribute,
    /// relationship and link tables.
    #[must_use]
    pub fn extend(&self, name: impl Into<String>) -> BlueprintBuilder<M> {
        BlueprintBuilder {
            name: name.into(),
            id: Some(Arc::clone(&self.id)),
            type_rule: self.type_rule.clone(),
            meta: self.meta.clone(),
            attributes: self.attributes.clone(),
            relationships: self.relationships.clone(),
            links: self.links.clone(),
            api_version: self.api_version.clone(),
        }
    }
}

impl<M> Blueprint<M> {
    /// Returns the blueprint's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared API version, if any.
    #[must_use]
    pub const fn api_version(&self) -> Option<&ApiVersion> {
        self.api_version.as_ref()
    }

    /// Returns the fixed resource type, if one was declared.
    ///
    /// Returns `None` when the type is computed per model.
    #[must_use]
    pub fn fixed_type(&self) -> Option<&str> {
        match &self.type_rule {
            Some(TypeRule::Fixed(value)) => Some(value.as_str()),
            Some(TypeRule::Computed(_)) => None,
            None => Some(self.name.as_str()),
        }
    }

    /// Returns the declared attribute names in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Returns the declared relationship names in declaration order.
    pub fn relationship_names(&self) -> impl Iterator<Item = &str> {
        self.relationships.keys().map(String::as_str)
    }

    /// Returns the declared link names in declaration order.
    pub fn link_names(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    /// Returns `true` if an attribute with this name is declared.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Returns `true` if a relationship with this name is declared.
    #[must_use]
    pub fn has_relationship(&self, name: &str) -> bool {
        self.relationships.contains_key(name)
    }
}

impl<M> fmt::Debug for Blueprint<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("name", &self.name)
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .field("relationships", &self.relationships.keys().collect::<Vec<_>>())
            .field("links", &self.links.keys().collect::<Vec<_>>())
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Blueprint`]s.
///
/// Every declaration replaces any earlier declaration of the same rule.
/// Re-declaring an attribute, relationship or link keeps its original
/// position.
pub struct BlueprintBuilder<M> {
    name: String,
    id: Option<StringRule<M>>,
    type_rule: Option<TypeRule<M>>,
    meta: Option<MetaRule<M>>,
    attributes: IndexMap<String, ValueRule<M>>,
    relationships: IndexMap<String, Arc<RelationshipDecl<M>>>,
    links: IndexMap<String, LinkRule<M>>,
    api_version: Option<ApiVersion>,
}

impl<M: 'static> BlueprintBuilder<M> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            type_rule: None,
            meta: None,
            attributes: IndexMap::new(),
            relationships: IndexMap::new(),
            links: IndexMap::new(),
            api_version: None,
        }
    }

    /// Declares a fixed resource type.
    #[must_use]
    pub fn type_name(mut self, value: impl Into<String>) -> Self {
        self.type_rule = Some(TypeRule::Fixed(value.into()));
        self
    }

    /// Declares a resource type computed from the model.
    #[must_use]
    pub fn type_with<F, S>(mut self, rule: F) -> Self
    where
        F: Fn(&Scope<'_, M>) -> Result<S, RenderError> + Send + Sync + 'static,
        S: Into<String>,
    {
        self.type_rule = Some(TypeRule::Computed(string_rule(move |scope| {
            rule(scope).map(Into::into)
        })));
        self
    }

    /// Declares how the resource id is computed.
    ///
    /// The returned value is converted with [`ToString`].
    #[must_use]
    pub fn id<F, T>(mut self, rule: F) -> Self
    where
        F: Fn(&Scope<'_, M>) -> Result<T, RenderError> + Send + Sync + 'static,
        T: ToString,
    {
        self.id = Some(string_rule(move |scope| {
            rule(scope).map(|id| id.to_string())
        }));
        self
    }

    /// Declares fixed meta information for the resource.
    #[must_use]
    pub fn meta(mut self, value: Value) -> Self {
        self.meta = Some(MetaRule::Fixed(value));
        self
    }

    /// Declares meta information computed from the model.
    #[must_use]
    pub fn meta_with<F, T>(mut self, rule: F) -> Self
    where
        F: Fn(&Scope<'_, M>) -> Result<T, RenderError> + Send + Sync + 'static,
        T: Serialize,
    {
        self.meta = Some(MetaRule::Computed(value_rule(move |scope| {
            Ok(serde_json::to_value(rule(scope)?)?)
        })));
        self
    }

    /// Declares an attribute.
    ///
    /// The rule may return any [`Serialize`] value. It runs at most once per
    /// resource instance, the first time the attribute is rendered.
    #[must_use]
    pub fn attribute<F, T>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Scope<'_, M>) -> Result<T, RenderError> + Send + Sync + 'static,
        T: Serialize,
    {
        self.attributes.insert(
            name.into(),
            value_rule(move |scope| Ok(serde_json::to_value(rule(scope)?)?)),
        );
        self
    }

    /// Declares a relationship.
    ///
    /// `configure` receives an empty [`RelationshipBuilder`] and declares the
    /// relationship's data, linkage data, links and meta on it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use jsonapi_serializable::{Blueprint, ResourceIdentifier};
    ///
    /// struct Post {
    ///     id: u64,
    ///     author_id: u64,
    /// }
    ///
    /// let posts = Blueprint::<Post>::builder("posts")
    ///     .id(|scope| Ok(scope.model().id))
    ///     .relationship("author", |rel| {
    ///         rel.linkage_data(|scope| {
    ///             Ok(ResourceIdentifier::new("users", scope.model().author_id.to_string()))
    ///         })
    ///         .link("related", |scope| {
    ///             Ok(format!("https://api.example.com/posts/{}/author", scope.model().id))
    ///         })
    ///     })
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(posts.has_relationship("author"));
    /// ```
    #[must_use]
    pub fn relationship<C>(mut self, name: impl Into<String>, configure: C) -> Self
    where
        C: FnOnce(RelationshipBuilder<M>) -> RelationshipBuilder<M>,
    {
        let relationship = configure(RelationshipBuilder::new()).build();
        self.relationships.insert(name.into(), Arc::new(relationship));
        self
    }

    /// Declares a resource-level link.
    #[must_use]
    pub fn link<F, L>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Scope<'_, M>) -> Result<L, RenderError> + Send + Sync + 'static,
        L: Into<Link>,
    {
        self.links.insert(
            name.into(),
            link_rule(move |scope| rule(scope).map(Into::into)),
        );
        self
    }

    /// Declares the API version this blueprint belongs to.
    ///
    /// The version is used when inferring the blueprints of related models.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Builds the [`Blueprint`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBlueprintName`] if the name is empty and
    /// [`ConfigError::MissingRequiredField`] if no id rule was declared or
    /// inherited.
    pub fn build(self) -> Result<Blueprint<M>, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyBlueprintName);
        }
        let id = self
            .id
            .ok_or(ConfigError::MissingRequiredField { field: "id" })?;

        Ok(Blueprint {
            name: self.name,
            id,
            type_rule: self.type_rule,
            meta: self.meta,
            attributes: self.attributes,
            relationships: self.relationships,
            links: self.links,
            api_version: self.api_version,
        })
    }
}

impl<M: Serialize + 'static> BlueprintBuilder<M> {
    /// Declares an attribute read from the model's serde representation.
    ///
    /// `field("name")` renders the value the model serializes under the key
    /// `"name"`.
    #[must_use]
    pub fn field(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let key = name.clone();
        self.attribute(name, move |scope| scope.field(&key))
    }

    /// Declares several attributes read from the model's serde representation.
    #[must_use]
    pub fn fields<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(self, |builder, name| builder.field(name))
    }
}

impl<M> fmt::Debug for BlueprintBuilder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlueprintBuilder")
            .field("name", &self.name)
            .field("has_id", &self.id.is_some())
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .field("relationships", &self.relationships.keys().collect::<Vec<_>>())
            .field("links", &self.links.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
