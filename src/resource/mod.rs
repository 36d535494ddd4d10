//! Resource rendering.
//!
//! This module turns application models into JSON:API resource objects.
//!
//! # Overview
//!
//! - [`Blueprint`]: the declared rules for one kind of model (id, type,
//!   attributes, relationships, links and meta), built once with a
//!   [`BlueprintBuilder`] and shared
//! - [`Resource`]: a blueprint bound to one model, ready to render
//! - [`Serializable`]: the object-safe interface document builders use to
//!   render resources and collect related ones
//! - [`Context`] / [`Scope`]: the values every rule is evaluated against
//! - [`RenderOptions`]: field selection and relationship inclusion for one
//!   render
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use jsonapi_serializable::{
//!     Blueprint, Context, RelationshipData, RenderOptions, Resource, Serializable,
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
//! let users = Arc::new(
//!     Blueprint::<User>::builder("users")
//!         .id(|scope| Ok(scope.model().id))
//!         .attribute("name", |scope| Ok(scope.model().name.clone()))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let posts = Arc::new(
//!     Blueprint::<Post>::builder("posts")
//!         .id(|scope| Ok(scope.model().id))
//!         .attribute("title", |scope| Ok(scope.model().title.clone()))
//!         .relationship("author", move |rel| {
//!             rel.data(move |scope| {
//!                 let author = Resource::from_option(
//!                     Arc::clone(&users),
//!                     scope.model().author.as_ref(),
//!                     scope.context().clone(),
//!                 )?;
//!                 Ok(RelationshipData::one(author))
//!             })
//!         })
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
//!     rendered["relationships"]["author"]["data"],
//!     json!({ "id": "2", "type": "users", "attributes": { "name": "Lucas" } })
//! );
//! ```

mod blueprint;
mod context;
mod errors;
mod instance;
mod link;
mod options;
mod relationship;

pub use blueprint::{Blueprint, BlueprintBuilder};
pub use context::{Context, Scope};
pub use errors::{BoxError, RenderError};
pub use instance::{RelatedInstances, Resource, Serializable};
pub use link::Link;
pub use options::RenderOptions;
pub use relationship::{Linkage, RelationshipBuilder, RelationshipData, ResourceIdentifier};
