//! Relationship declarations and their evaluation.
//!
//! A relationship is declared with a [`RelationshipBuilder`] and may carry:
//!
//! - **data**: a rule producing the related resources ([`RelationshipData`])
//! - **linkage data**: a rule producing resource identifiers directly
//!   ([`Linkage`]), without building related resources
//! - **links** and **meta**
//!
//! # Rendering
//!
//! When a relationship is rendered, its `data` member is chosen as follows:
//!
//! 1. If the relationship is included and has a data rule, each related
//!    resource is rendered in full.
//! 2. Otherwise, if it has a linkage data rule, the linkage is used.
//! 3. Otherwise, if it is not included, has a data rule, and renders no
//!    links or meta, the identifiers of the related resources are used.
//! 4. Otherwise `data` is left out.
//!
//! `links` and `meta` are rendered whenever they are non-empty. Data and
//! linkage rules run on every render; their results are not cached.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resource::blueprint::{evaluate_links, link_rule, value_rule, LinkRule, MetaRule};
use crate::resource::{Link, RenderError, RenderOptions, Scope, Serializable};

pub(crate) type DataRule<M> = Arc<
    dyn for<'a> Fn(&Scope<'a, M>) -> Result<RelationshipData<'a>, RenderError> + Send + Sync,
>;
pub(crate) type LinkageRule<M> =
    Arc<dyn Fn(&Scope<'_, M>) -> Result<Linkage, RenderError> + Send + Sync>;

/// A resource identifier object: the `type` and `id` of a resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// The resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// The resource id.
    pub id: String,
}

impl ResourceIdentifier {
    /// Creates a resource identifier.
    #[must_use]
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

/// Resource linkage: the `data` of a relationship when related resources
/// are identified rather than rendered.
///
/// Serializes to an identifier object, `null`, or an array of identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    /// A to-one relationship; `None` for an empty one.
    One(Option<ResourceIdentifier>),
    /// A to-many relationship.
    Many(Vec<ResourceIdentifier>),
}

impl From<ResourceIdentifier> for Linkage {
    fn from(identifier: ResourceIdentifier) -> Self {
        Self::One(Some(identifier))
    }
}

impl From<Option<ResourceIdentifier>> for Linkage {
    fn from(identifier: Option<ResourceIdentifier>) -> Self {
        Self::One(identifier)
    }
}

impl From<Vec<ResourceIdentifier>> for Linkage {
    fn from(identifiers: Vec<ResourceIdentifier>) -> Self {
        Self::Many(identifiers)
    }
}

/// The related resources produced by a relationship's data rule.
///
/// `'a` is the lifetime of the borrowed models the related resources wrap.
pub enum RelationshipData<'a> {
    /// A to-one relationship. The resource may be nil.
    One(Box<dyn Serializable + 'a>),
    /// An empty to-one relationship.
    Null,
    /// A to-many relationship.
    Many(Vec<Box<dyn Serializable + 'a>>),
}

impl<'a> RelationshipData<'a> {
    /// Wraps a single related resource.
    #[must_use]
    pub fn one<S: Serializable + 'a>(resource: S) -> Self {
        Self::One(Box::new(resource))
    }

    /// Wraps a collection of related resources.
    #[must_use]
    pub fn many<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Serializable + 'a,
    {
        Self::Many(
            resources
                .into_iter()
                .map(|resource| Box::new(resource) as Box<dyn Serializable + 'a>)
                .collect(),
        )
    }

    /// Returns the identifiers of the related resources.
    ///
    /// Nil resources become `null` in a to-one relationship and are skipped
    /// in a to-many relationship.
    #[must_use]
    pub fn linkage(&self) -> Linkage {
        match self {
            Self::One(resource) => Linkage::One(resource.linkage()),
            Self::Null => Linkage::One(None),
            Self::Many(resources) => {
                Linkage::Many(resources.iter().filter_map(|r| r.linkage()).collect())
            }
        }
    }

    /// Renders the related resources in full with default options.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while rendering a related resource.
    pub fn render(&self) -> Result<Value, RenderError> {
        let options = RenderOptions::default();
        match self {
            Self::One(resource) => resource.render(&options),
            Self::Null => Ok(Value::Null),
            Self::Many(resources) => resources
                .iter()
                .filter(|resource| !resource.is_nil())
                .map(|resource| resource.render(&options))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
        }
    }

    /// Returns the non-nil related resources.
    #[must_use]
    pub fn into_resources(self) -> Vec<Box<dyn Serializable + 'a>> {
        match self {
            Self::One(resource) if !resource.is_nil() => vec![resource],
            Self::One(_) | Self::Null => Vec::new(),
            Self::Many(resources) => resources
                .into_iter()
                .filter(|resource| !resource.is_nil())
                .collect(),
        }
    }
}

impl fmt::Debug for RelationshipData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RelationshipData")
            .field(&self.linkage())
            .finish()
    }
}

/// Builder for a relationship declaration.
///
/// Obtained through
/// [`BlueprintBuilder::relationship`](crate::resource::BlueprintBuilder::relationship).
/// Each declaration replaces any earlier one of the same kind, so a block
/// run after a generated declaration can override it.
pub struct RelationshipBuilder<M> {
    data: Option<DataRule<M>>,
    linkage_data: Option<LinkageRule<M>>,
    links: IndexMap<String, LinkRule<M>>,
    meta: Option<MetaRule<M>>,
}

impl<M: 'static> RelationshipBuilder<M> {
    pub(crate) fn new() -> Self {
        Self {
            data: None,
            linkage_data: None,
            links: IndexMap::new(),
            meta: None,
        }
    }

    /// Declares the rule producing the related resources.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use jsonapi_serializable::{Blueprint, RelationshipData, Resource};
    ///
    /// struct Comment { id: u64 }
    /// struct Post { id: u64, comments: Vec<Comment> }
    ///
    /// let comments = Arc::new(
    ///     Blueprint::<Comment>::builder("comments")
    ///         .id(|scope| Ok(scope.model().id))
    ///         .build()
    ///         .unwrap(),
    /// );
    ///
    /// let posts = Blueprint::<Post>::builder("posts")
    ///     .id(|scope| Ok(scope.model().id))
    ///     .relationship("comments", move |rel| {
    ///         rel.data(move |scope| {
    ///             let resources = scope
    ///                 .model()
    ///                 .comments
    ///                 .iter()
    ///                 .map(|comment| Resource::new(Arc::clone(&comments), comment, scope.context().clone()))
    ///                 .collect::<Result<Vec<_>, _>>()?;
    ///             Ok(RelationshipData::many(resources))
    ///         })
    ///     })
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(posts.has_relationship("comments"));
    /// ```
    #[must_use]
    pub fn data<F>(mut self, rule: F) -> Self
    where
        F: for<'a> Fn(&Scope<'a, M>) -> Result<RelationshipData<'a>, RenderError>
            + Send
            + Sync
            + 'static,
    {
        self.data = Some(Arc::new(rule));
        self
    }

    /// Declares the rule producing resource linkage directly.
    #[must_use]
    pub fn linkage_data<F, L>(mut self, rule: F) -> Self
    where
        F: Fn(&Scope<'_, M>) -> Result<L, RenderError> + Send + Sync + 'static,
        L: Into<Linkage>,
    {
        self.linkage_data = Some(linkage_rule(move |scope| rule(scope).map(Into::into)));
        self
    }

    /// Declares a relationship link.
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

    /// Declares fixed meta information for the relationship.
    #[must_use]
    pub fn meta(mut self, value: Value) -> Self {
        self.meta = Some(MetaRule::Fixed(value));
        self
    }

    /// Declares relationship meta information computed from the model.
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

    pub(crate) fn build(self) -> RelationshipDecl<M> {
        RelationshipDecl {
            data: self.data,
            linkage_data: self.linkage_data,
            links: self.links,
            meta: self.meta,
        }
    }
}

impl<M> fmt::Debug for RelationshipBuilder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipBuilder")
            .field("has_data", &self.data.is_some())
            .field("has_linkage_data", &self.linkage_data.is_some())
            .field("links", &self.links.keys().collect::<Vec<_>>())
            .field("has_meta", &self.meta.is_some())
            .finish()
    }
}

fn linkage_rule<M, F>(rule: F) -> LinkageRule<M>
where
    F: Fn(&Scope<'_, M>) -> Result<Linkage, RenderError> + Send + Sync + 'static,
{
    Arc::new(rule)
}

/// A built relationship declaration, shared by every instance of a blueprint.
pub(crate) struct RelationshipDecl<M> {
    data: Option<DataRule<M>>,
    linkage_data: Option<LinkageRule<M>>,
    links: IndexMap<String, LinkRule<M>>,
    meta: Option<MetaRule<M>>,
}

/// A relationship bound to one resource instance.
///
/// Links and meta are evaluated when the instance is built; data and
/// linkage are evaluated on each render.
pub(crate) struct RelationshipState<M> {
    decl: Arc<RelationshipDecl<M>>,
    links: Map<String, Value>,
    meta: Option<Value>,
}

impl<M> RelationshipState<M> {
    pub(crate) fn new(
        decl: Arc<RelationshipDecl<M>>,
        scope: &Scope<'_, M>,
    ) -> Result<Self, RenderError> {
        let links = evaluate_links(&decl.links, scope)?;
        let meta = match &decl.meta {
            Some(rule) => Some(rule.evaluate(scope)?).filter(|meta| !is_blank(meta)),
            None => None,
        };

        Ok(Self { decl, links, meta })
    }

    /// Evaluates the data rule, if declared.
    pub(crate) fn data<'a>(
        &self,
        scope: &Scope<'a, M>,
    ) -> Result<Option<RelationshipData<'a>>, RenderError> {
        self.decl.data.as_ref().map(|rule| rule(scope)).transpose()
    }

    /// Renders the relationship object. An empty map means the relationship
    /// has nothing to render.
    pub(crate) fn render(
        &self,
        name: &str,
        scope: &Scope<'_, M>,
        included: bool,
    ) -> Result<Map<String, Value>, RenderError> {
        let mut rendered = Map::new();

        if let Some(data) = self.render_data(name, scope, included)? {
            rendered.insert("data".to_string(), data);
        }
        if !self.links.is_empty() {
            rendered.insert("links".to_string(), Value::Object(self.links.clone()));
        }
        if let Some(meta) = &self.meta {
            rendered.insert("meta".to_string(), meta.clone());
        }

        Ok(rendered)
    }

    fn render_data(
        &self,
        name: &str,
        scope: &Scope<'_, M>,
        included: bool,
    ) -> Result<Option<Value>, RenderError> {
        if included {
            if let Some(data) = self.data(scope)? {
                tracing::debug!(relationship = name, "rendering included relationship data");
                return data.render().map(Some);
            }
        }

        if let Some(rule) = &self.decl.linkage_data {
            let linkage = rule(scope)?;
            return Ok(Some(serde_json::to_value(linkage)?));
        }

        if !included && self.links.is_empty() && self.meta.is_none() {
            if let Some(data) = self.data(scope)? {
                return Ok(Some(serde_json::to_value(data.linkage())?));
            }
        }

        Ok(None)
    }
}

/// `null` and `{}` count as absent meta.
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
