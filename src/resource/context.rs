//! Evaluation context handed to every rule.
//!
//! A [`Context`] carries the auxiliary values a caller supplies when building
//! a resource (URL helpers, the current user, feature flags, ...) together
//! with the optional [`BlueprintRegistry`] used for convention-based
//! relationship lookup. A [`Scope`] pairs a context with the model being
//! rendered and is what rules actually receive.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_serializable::Context;
//!
//! let context = Context::new().with("base_url", "https://api.example.com".to_string());
//! assert_eq!(
//!     context.get::<String>("base_url").map(String::as_str),
//!     Some("https://api.example.com")
//! );
//! assert!(context.get::<u32>("base_url").is_none());
//! ```

use std::any::Any;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::ApiVersion;
use crate::model::BlueprintRegistry;
use crate::resource::RenderError;

/// Named auxiliary values available to every rule.
///
/// Cloning is cheap: values are reference counted. Nested resources built
/// by relationship helpers share the context of their parent.
#[derive(Clone, Default)]
pub struct Context {
    values: HashMap<String, Arc<dyn Any + Send + Sync>>,
    registry: Option<Arc<BlueprintRegistry>>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named value, replacing any previous value under the same key.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a named value in place.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) -> &mut Self {
        self.values.insert(key.into(), Arc::new(value));
        self
    }

    /// Attaches the registry used to resolve related blueprints by name.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<BlueprintRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Returns the attached blueprint registry, if any.
    #[must_use]
    pub fn registry(&self) -> Option<&BlueprintRegistry> {
        self.registry.as_deref()
    }

    /// Returns the value stored under `key` if it has type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Returns `true` if a value is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of named values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no named values are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Context")
            .field("keys", &keys)
            .field("registry", &self.registry.is_some())
            .finish()
    }
}

// Verify Context is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Context>();
};

/// The model and context a rule is evaluated against.
///
/// `'a` is the lifetime of the borrowed model. Nested resources built from
/// [`model`](Self::model) may borrow for the same lifetime.
pub struct Scope<'a, M> {
    model: &'a M,
    context: Context,
    api_version: Option<ApiVersion>,
    snapshot: OnceCell<Value>,
}

impl<'a, M> Scope<'a, M> {
    pub(crate) fn new(model: &'a M, context: Context, api_version: Option<ApiVersion>) -> Self {
        Self {
            model,
            context,
            api_version,
            snapshot: OnceCell::new(),
        }
    }

    /// Returns the model being rendered.
    #[must_use]
    pub const fn model(&self) -> &'a M {
        self.model
    }

    /// Returns the full evaluation context.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Returns the API version declared by the rendering blueprint.
    #[must_use]
    pub const fn api_version(&self) -> Option<&ApiVersion> {
        self.api_version.as_ref()
    }

    /// Returns the context value stored under `key` if it has type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.context.get(key)
    }

    /// Returns the context value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingContext`] if there is no value under
    /// `key` or it is not a `T`.
    pub fn require<T: Any>(&self, key: &str) -> Result<&T, RenderError> {
        self.get(key).ok_or_else(|| RenderError::MissingContext {
            key: key.to_string(),
        })
    }
}

impl<'a, M: Serialize> Scope<'a, M> {
    /// Reads a field from the model's serde representation.
    ///
    /// The model is serialized once per scope; later lookups reuse the
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialization`] if the model cannot be
    /// serialized and [`RenderError::UnknownField`] if the serialized form
    /// has no such key.
    pub fn field(&self, name: &str) -> Result<Value, RenderError> {
        let snapshot = match self.snapshot.get() {
            Some(snapshot) => snapshot,
            None => {
                let value = serde_json::to_value(self.model)?;
                self.snapshot.get_or_init(|| value)
            }
        };

        snapshot
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::UnknownField {
                field: name.to_string(),
            })
    }
}

impl<M> fmt::Debug for Scope<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("model", &std::any::type_name::<M>())
            .field("context", &self.context)
            .field("api_version", &self.api_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Article {
        id: u32,
        title: String,
    }

    #[test]
    fn test_context_replaces_value_under_same_key() {
        let context = Context::new().with("limit", 10_u32).with("limit", 20_u32);

        assert_eq!(context.len(), 1);
        assert_eq!(context.get::<u32>("limit"), Some(&20));
    }

    #[test]
    fn test_context_get_checks_type() {
        let context = Context::new().with("flag", true);

        assert_eq!(context.get::<bool>("flag"), Some(&true));
        assert!(context.get::<String>("flag").is_none());
        assert!(context.get::<bool>("missing").is_none());
    }

    #[test]
    fn test_context_debug_lists_keys() {
        let context = Context::new().with("b", 1_u8).with("a", 2_u8);
        let debug = format!("{context:?}");

        assert!(debug.contains(r#"["a", "b"]"#));
    }

    #[test]
    fn test_scope_require_reports_missing_key() {
        let article = Article {
            id: 1,
            title: "Hello".to_string(),
        };
        let scope = Scope::new(&article, Context::new(), None);

        let result = scope.require::<String>("base_url");
        assert!(matches!(
            result,
            Err(RenderError::MissingContext { ref key }) if key == "base_url"
        ));
    }

    #[test]
    fn test_scope_field_reads_serialized_model() {
        let article = Article {
            id: 7,
            title: "Hello".to_string(),
        };
        let scope = Scope::new(&article, Context::new(), None);

        assert_eq!(scope.field("title").unwrap(), json!("Hello"));
        assert_eq!(scope.field("id").unwrap(), json!(7));
        assert!(matches!(
            scope.field("body"),
            Err(RenderError::UnknownField { ref field }) if field == "body"
        ));
    }
}
