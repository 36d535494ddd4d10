//! # JSON:API Serializable
//!
//! Declarative serialization of plain Rust models into JSON:API resource
//! objects.
//!
//! ## Overview
//!
//! This crate provides:
//! - Immutable, shareable [`Blueprint`]s declared with a [`BlueprintBuilder`]:
//!   id, type, attributes, relationships, links and meta rules
//! - Blueprint inheritance via [`Blueprint::extend`]
//! - [`Resource`] instances that bind a blueprint to one borrowed model,
//!   compute attributes lazily and at most once, and render with sparse
//!   fieldsets and relationship inclusion ([`RenderOptions`])
//! - Relationship rendering with full related resources, resource linkage,
//!   links and meta
//! - Convention-based blueprints for [`ResourceModel`]s, including
//!   `has_one`/`has_many` relationships whose blueprints are looked up in a
//!   [`BlueprintRegistry`]
//! - The object-safe [`Serializable`] trait for document builders
//!
//! Building the top-level document (`data`, `included`, `meta`) is left to
//! the caller; [`Serializable::related_instances`] exposes what it needs.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use jsonapi_serializable::{
//!     Blueprint, Context, Related, RenderOptions, Resource, ResourceModel, Serializable,
//! };
//! use serde_json::json;
//!
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! struct Post {
//!     id: u64,
//!     title: String,
//!     author: Option<User>,
//! }
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
//! let users = Arc::new(
//!     Blueprint::<User>::for_model()
//!         .attribute("name", |scope| Ok(scope.model().name.clone()))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let posts = Arc::new(
//!     Blueprint::<Post>::for_model()
//!         .attribute("title", |scope| Ok(scope.model().title.clone()))
//!         .has_one("author", Related::Blueprint(users), |post| post.author.as_ref())
//!         .link("self", |scope| Ok(format!("https://api.example.com/posts/{}", scope.model().id)))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let post = Post {
//!     id: 1,
//!     title: "Hello".to_string(),
//!     author: Some(User { id: 2, name: "Lucas".to_string() }),
//! };
//!
//! let resource = Resource::new(posts, &post, Context::new()).unwrap();
//! let rendered = resource.render(&RenderOptions::new().include(["author"])).unwrap();
//!
//! assert_eq!(
//!     rendered,
//!     json!({
//!         "id": "1",
//!         "type": "Post",
//!         "attributes": { "title": "Hello" },
//!         "relationships": {
//!             "author": {
//!                 "data": { "id": "2", "type": "User", "attributes": { "name": "Lucas" } }
//!             }
//!         },
//!         "links": { "self": "https://api.example.com/posts/1" }
//!     })
//! );
//! ```
//!
//! ## Context Values
//!
//! Rules receive a [`Scope`] giving access to the model and to the
//! [`Context`] the resource was built with:
//!
//! ```rust
//! use std::sync::Arc;
//! use jsonapi_serializable::{Blueprint, Context, RenderOptions, Resource, Serializable};
//!
//! struct Page { slug: String }
//!
//! let pages = Arc::new(
//!     Blueprint::<Page>::builder("pages")
//!         .id(|scope| Ok(scope.model().slug.clone()))
//!         .link("self", |scope| {
//!             let base = scope.require::<String>("base_url")?;
//!             Ok(format!("{base}/pages/{}", scope.model().slug))
//!         })
//!         .build()
//!         .unwrap(),
//! );
//!
//! let page = Page { slug: "about".to_string() };
//! let context = Context::new().with("base_url", "https://example.com".to_string());
//! let resource = Resource::new(pages, &page, context).unwrap();
//!
//! let rendered = resource.render(&RenderOptions::default()).unwrap();
//! assert_eq!(rendered["links"]["self"], "https://example.com/pages/about");
//! ```
//!
//! ## Design Principles
//!
//! - **Declare once**: blueprints are built at startup and shared behind an
//!   `Arc`
//! - **Borrow models**: resources borrow the model they render
//! - **Fail fast**: invalid declarations fail in `build()`; failing rules
//!   surface as [`RenderError`]
//! - **Thread-safe**: blueprints, registries and contexts are `Send + Sync`

pub mod config;
pub mod error;
pub mod model;
pub mod resource;

// Re-export public types at crate root for convenience
pub use config::{ApiVersion, Namespace, NamingConvention, NamingConventionBuilder};
pub use error::ConfigError;
pub use model::{BlueprintRegistry, Related, ResourceModel};
pub use resource::{
    Blueprint, BlueprintBuilder, BoxError, Context, Link, Linkage, RelatedInstances,
    RelationshipBuilder, RelationshipData, RenderError, RenderOptions, Resource,
    ResourceIdentifier, Scope, Serializable,
};
