//! Blueprint registry for convention-based relationship lookup.
//!
//! This module provides the [`BlueprintRegistry`] struct, which stores
//! blueprints under their conventional names so that `has_one`/`has_many`
//! relationships declared with [`Related::Inferred`](crate::model::Related)
//! can find the blueprint of the related model at render time.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use jsonapi_serializable::{ApiVersion, Blueprint, BlueprintRegistry, ResourceModel};
//!
//! struct User { id: u64 }
//!
//! impl ResourceModel for User {
//!     type Id = u64;
//!     const NAME: &'static str = "User";
//!     const NAMESPACE: Option<&'static str> = Some("Api");
//!
//!     fn get_id(&self) -> u64 {
//!         self.id
//!     }
//! }
//!
//! let v1 = ApiVersion::new("V1").unwrap();
//! let mut registry = BlueprintRegistry::new();
//! registry
//!     .register(Some(&v1), Arc::new(Blueprint::<User>::for_model().build().unwrap()))
//!     .unwrap();
//!
//! assert!(registry.contains("Api::V1::SerializableUser"));
//! assert!(registry.resolve::<User>(Some(&v1)).is_ok());
//! assert!(registry.resolve::<User>(None).is_err());
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::{ApiVersion, Namespace, NamingConvention};
use crate::error::ConfigError;
use crate::model::ResourceModel;
use crate::resource::{Blueprint, RenderError};

/// Registry of blueprints keyed by conventional name.
///
/// Entries are type-erased: a lookup succeeds only when the stored
/// blueprint serializes the requested model type.
///
/// # Thread Safety
///
/// `BlueprintRegistry` is `Send + Sync`. It is usually built once at
/// startup and shared behind an [`Arc`] through
/// [`Context::with_registry`](crate::Context::with_registry).
#[derive(Default)]
pub struct BlueprintRegistry {
    convention: NamingConvention,
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

// Implement Debug manually since trait objects don't implement Debug
impl fmt::Debug for BlueprintRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlueprintRegistry")
            .field("convention", &self.convention)
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

// Verify BlueprintRegistry is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BlueprintRegistry>();
};

impl BlueprintRegistry {
    /// Creates an empty registry using the default [`NamingConvention`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry using `convention` to derive names.
    #[must_use]
    pub fn with_convention(convention: NamingConvention) -> Self {
        Self {
            convention,
            entries: HashMap::new(),
        }
    }

    /// Returns the naming convention of this registry.
    #[must_use]
    pub const fn convention(&self) -> &NamingConvention {
        &self.convention
    }

    /// Stores a blueprint under an explicit name, replacing any previous
    /// entry with that name.
    pub fn insert<N: 'static>(
        &mut self,
        name: impl Into<String>,
        blueprint: Arc<Blueprint<N>>,
    ) -> &mut Self {
        self.entries.insert(name.into(), blueprint);
        self
    }

    /// Stores a blueprint under the conventional name of `N` for `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNamespace`] if `N::NAMESPACE` is not a
    /// valid namespace.
    pub fn register<N: ResourceModel + 'static>(
        &mut self,
        version: Option<&ApiVersion>,
        blueprint: Arc<Blueprint<N>>,
    ) -> Result<&mut Self, ConfigError> {
        let name = self.expected_name::<N>(version)?;
        Ok(self.insert(name, blueprint))
    }

    /// Returns the conventional blueprint name of `N` for `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNamespace`] if `N::NAMESPACE` is not a
    /// valid namespace.
    pub fn expected_name<N: ResourceModel>(
        &self,
        version: Option<&ApiVersion>,
    ) -> Result<String, ConfigError> {
        conventional_name::<N>(&self.convention, version)
    }

    /// Returns the blueprint stored under `name` if it serializes `N`.
    #[must_use]
    pub fn get<N: 'static>(&self, name: &str) -> Option<Arc<Blueprint<N>>> {
        let entry = Arc::clone(self.entries.get(name)?);
        entry.downcast::<Blueprint<N>>().ok()
    }

    /// Finds the blueprint for `N` under its conventional name.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Resolution`] naming the expected blueprint if
    /// there is no entry for `N` under that name.
    pub fn resolve<N: ResourceModel + 'static>(
        &self,
        version: Option<&ApiVersion>,
    ) -> Result<Arc<Blueprint<N>>, RenderError> {
        let expected = self.expected_name::<N>(version)?;

        if let Some(blueprint) = self.get::<N>(&expected) {
            tracing::debug!(blueprint = %expected, "resolved related blueprint");
            return Ok(blueprint);
        }

        tracing::warn!(
            blueprint = %expected,
            registered = self.entries.len(),
            "no blueprint registered for related model"
        );
        Err(RenderError::Resolution { expected })
    }

    /// Returns `true` if any blueprint is stored under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.into_iter()
    }

    /// Returns the number of registered blueprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no blueprints are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the conventional blueprint name of `N` under `convention`.
pub(crate) fn conventional_name<N: ResourceModel>(
    convention: &NamingConvention,
    version: Option<&ApiVersion>,
) -> Result<String, ConfigError> {
    let namespace = N::NAMESPACE.map(Namespace::new).transpose()?;
    Ok(convention.blueprint_name(namespace.as_ref(), version, N::NAME))
}
