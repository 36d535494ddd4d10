//! Convention-based blueprints for application models.
//!
//! Implementing [`ResourceModel`] for a model type lets a blueprint infer
//! its resource type and id ([`Blueprint::for_model`]) and lets other
//! blueprints declare relationships to it with `has_one`/`has_many`.
//!
//! # Related blueprints
//!
//! A relationship helper takes a [`Related`]:
//!
//! - [`Related::Blueprint`]: use this blueprint for the related models
//! - [`Related::Inferred`]: look the blueprint up by conventional name in
//!   the [`BlueprintRegistry`] carried by the render
//!   [`Context`](crate::Context)
//!
//! The conventional name joins the related model's
//! [`NAMESPACE`](ResourceModel::NAMESPACE), the API version of the declaring
//! blueprint and `"Serializable"` followed by the model's
//! [`NAME`](ResourceModel::NAME), e.g. `Api::V1::SerializableUser`.
//! Lookup happens when relationship data is evaluated; a miss is a
//! [`RenderError::Resolution`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use jsonapi_serializable::{
//!     Blueprint, Context, Related, RenderOptions, Resource, ResourceModel, Serializable,
//! };
//! use serde_json::json;
//!
//! struct User { id: u64 }
//! struct Post { id: u64, author: Option<User> }
//!
//! impl ResourceModel for User {
//!     type Id = u64;
//!     const NAME: &'static str = "User";
//!     fn get_id(&self) -> u64 { self.id }
//! }
//!
//! impl ResourceModel for Post {
//!     type Id = u64;
//!     const NAME: &'static str = "Post";
//!     fn get_id(&self) -> u64 { self.id }
//! }
//!
//! let users = Arc::new(Blueprint::<User>::for_model().build().unwrap());
//! let posts = Arc::new(
//!     Blueprint::<Post>::for_model()
//!         .has_one("author", Related::Blueprint(users), |post| post.author.as_ref())
//!         .build()
//!         .unwrap(),
//! );
//!
//! let post = Post { id: 1, author: Some(User { id: 2 }) };
//! let resource = Resource::new(posts, &post, Context::new()).unwrap();
//!
//! assert_eq!(
//!     resource.render(&RenderOptions::default()).unwrap(),
//!     json!({
//!         "id": "1",
//!         "type": "Post",
//!         "relationships": { "author": { "data": { "type": "User", "id": "2" } } }
//!     })
//! );
//! ```

mod registry;

pub use registry::BlueprintRegistry;

use std::fmt;
use std::sync::Arc;

use crate::config::NamingConvention;
use crate::resource::{
    Blueprint, BlueprintBuilder, RelationshipBuilder, RelationshipData, RenderError, Resource,
    Scope,
};

/// A model that can be serialized by convention.
///
/// # Example
///
/// ```rust
/// use jsonapi_serializable::ResourceModel;
///
/// struct Invoice {
///     number: String,
/// }
///
/// impl ResourceModel for Invoice {
///     type Id = String;
///     const NAME: &'static str = "Invoice";
///     const NAMESPACE: Option<&'static str> = Some("Billing");
///
///     fn get_id(&self) -> String {
///         self.number.clone()
///     }
/// }
/// ```
pub trait ResourceModel {
    /// The id type. Rendered with its [`Display`](fmt::Display) impl.
    type Id: fmt::Display;

    /// The model name, used as the default resource type and in
    /// conventional blueprint names.
    const NAME: &'static str;

    /// The `::`-separated namespace the model lives in, if any.
    const NAMESPACE: Option<&'static str> = None;

    /// Returns the model's id.
    fn get_id(&self) -> Self::Id;
}

impl<M: ResourceModel + 'static> Blueprint<M> {
    /// Starts a blueprint for a [`ResourceModel`].
    ///
    /// The builder is named after [`ResourceModel::NAME`], its type is fixed
    /// to the same name and its id is [`ResourceModel::get_id`]. All three
    /// can be overridden on the returned builder.
    #[must_use]
    pub fn for_model() -> BlueprintBuilder<M> {
        Self::builder(M::NAME)
            .type_name(M::NAME)
            .id(|scope| Ok(scope.model().get_id()))
    }
}

/// Which blueprint renders the models of a relationship.
pub enum Related<N> {
    /// Use this blueprint.
    Blueprint(Arc<Blueprint<N>>),
    /// Look the blueprint up by conventional name at render time.
    Inferred,
}

impl<N: ResourceModel + 'static> Related<N> {
    /// Returns the blueprint for the related models.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Resolution`] if the blueprint is inferred and
    /// the scope's context has no matching registry entry.
    pub fn resolve<M>(&self, scope: &Scope<'_, M>) -> Result<Arc<Blueprint<N>>, RenderError> {
        match self {
            Self::Blueprint(blueprint) => Ok(Arc::clone(blueprint)),
            Self::Inferred => match scope.context().registry() {
                Some(registry) => registry.resolve::<N>(scope.api_version()),
                None => {
                    let expected = registry::conventional_name::<N>(
                        &NamingConvention::default(),
                        scope.api_version(),
                    )?;
                    tracing::warn!(blueprint = %expected, "no blueprint registry in render context");
                    Err(RenderError::Resolution { expected })
                }
            },
        }
    }
}

impl<N> Clone for Related<N> {
    fn clone(&self) -> Self {
        match self {
            Self::Blueprint(blueprint) => Self::Blueprint(Arc::clone(blueprint)),
            Self::Inferred => Self::Inferred,
        }
    }
}

impl<N> fmt::Debug for Related<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blueprint(blueprint) => f.debug_tuple("Blueprint").field(&blueprint.name()).finish(),
            Self::Inferred => f.write_str("Inferred"),
        }
    }
}

impl<N> From<Arc<Blueprint<N>>> for Related<N> {
    fn from(blueprint: Arc<Blueprint<N>>) -> Self {
        Self::Blueprint(blueprint)
    }
}

impl<N> From<Blueprint<N>> for Related<N> {
    fn from(blueprint: Blueprint<N>) -> Self {
        Self::Blueprint(Arc::new(blueprint))
    }
}

impl<M: ResourceModel + 'static> BlueprintBuilder<M> {
    /// Declares a to-one relationship to another [`ResourceModel`].
    ///
    /// `accessor` returns the related model, or `None` for an empty
    /// relationship. The related resource shares the context of the
    /// declaring one.
    #[must_use]
    pub fn has_one<N, A>(self, name: impl Into<String>, related: impl Into<Related<N>>, accessor: A) -> Self
    where
        N: ResourceModel + 'static,
        A: for<'x> Fn(&'x M) -> Option<&'x N> + Send + Sync + 'static,
    {
        self.has_one_with(name, related, accessor, |rel| rel)
    }

    /// Declares a to-one relationship, then runs `configure` on it.
    ///
    /// `configure` may add links or meta, or replace the generated data
    /// with linkage data.
    ///
    /// # Example
    ///
    /// ```rust
    /// use jsonapi_serializable::{Blueprint, Related, ResourceModel};
    ///
    /// struct User { id: u64 }
    /// struct Post { id: u64, author: Option<User> }
    ///
    /// impl ResourceModel for User {
    ///     type Id = u64;
    ///     const NAME: &'static str = "User";
    ///     fn get_id(&self) -> u64 { self.id }
    /// }
    ///
    /// impl ResourceModel for Post {
    ///     type Id = u64;
    ///     const NAME: &'static str = "Post";
    ///     fn get_id(&self) -> u64 { self.id }
    /// }
    ///
    /// let posts = Blueprint::<Post>::for_model()
    ///     .has_one_with("author", Related::<User>::Inferred, |post| post.author.as_ref(), |rel| {
    ///         rel.link("self", |scope| {
    ///             Ok(format!("https://api.example.com/posts/{}/relationships/author", scope.model().id))
    ///         })
    ///     })
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(posts.has_relationship("author"));
    /// ```
    #[must_use]
    pub fn has_one_with<N, A, C>(
        self,
        name: impl Into<String>,
        related: impl Into<Related<N>>,
        accessor: A,
        configure: C,
    ) -> Self
    where
        N: ResourceModel + 'static,
        A: for<'x> Fn(&'x M) -> Option<&'x N> + Send + Sync + 'static,
        C: FnOnce(RelationshipBuilder<M>) -> RelationshipBuilder<M>,
    {
        let related = related.into();
        self.relationship(name, move |rel| {
            configure(rel.data(move |scope| {
                let Some(model) = accessor(scope.model()) else {
                    return Ok(RelationshipData::Null);
                };
                let blueprint = related.resolve(scope)?;
                let resource = Resource::new(blueprint, model, scope.context().clone())?;
                Ok(RelationshipData::one(resource))
            }))
        })
    }

    /// Declares a to-many relationship to another [`ResourceModel`].
    ///
    /// `accessor` returns the related models. Each related resource shares
    /// the context of the declaring one.
    #[must_use]
    pub fn has_many<N, A>(self, name: impl Into<String>, related: impl Into<Related<N>>, accessor: A) -> Self
    where
        N: ResourceModel + 'static,
        A: for<'x> Fn(&'x M) -> Vec<&'x N> + Send + Sync + 'static,
    {
        self.has_many_with(name, related, accessor, |rel| rel)
    }

    /// Declares a to-many relationship, then runs `configure` on it.
    #[must_use]
    pub fn has_many_with<N, A, C>(
        self,
        name: impl Into<String>,
        related: impl Into<Related<N>>,
        accessor: A,
        configure: C,
    ) -> Self
    where
        N: ResourceModel + 'static,
        A: for<'x> Fn(&'x M) -> Vec<&'x N> + Send + Sync + 'static,
        C: FnOnce(RelationshipBuilder<M>) -> RelationshipBuilder<M>,
    {
        let related = related.into();
        self.relationship(name, move |rel| {
            configure(rel.data(move |scope| {
                let models = accessor(scope.model());
                if models.is_empty() {
                    return Ok(RelationshipData::Many(Vec::new()));
                }
                let blueprint = related.resolve(scope)?;
                let resources = models
                    .into_iter()
                    .map(|model| Resource::new(Arc::clone(&blueprint), model, scope.context().clone()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(RelationshipData::many(resources))
            }))
        })
    }
}
