//! Resource instances: a blueprint bound to one model.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::resource::blueprint::{evaluate_links, TypeRule, ValueRule};
use crate::resource::relationship::RelationshipState;
use crate::resource::{
    Blueprint, Context, RenderError, RenderOptions, ResourceIdentifier, Scope,
};

/// Related resources grouped by relationship name.
pub type RelatedInstances<'a> = BTreeMap<String, Vec<Box<dyn Serializable + 'a>>>;

/// A value that renders as a JSON:API resource object.
///
/// This is the interface document builders use: they render each primary
/// resource, then walk [`related_instances`](Self::related_instances) to
/// collect the `included` section. It is object safe so resources over
/// different model types can be handled together.
pub trait Serializable {
    /// Returns the resource type.
    fn jsonapi_type(&self) -> &str;

    /// Returns the resource id. Empty for a nil resource.
    fn jsonapi_id(&self) -> &str;

    /// Returns `true` if the resource wraps no model and renders as `null`.
    fn is_nil(&self) -> bool;

    /// Renders the resource object.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a rule.
    fn render(&self, options: &RenderOptions) -> Result<Value, RenderError>;

    /// Returns the related resources of each relationship named in
    /// `include`.
    ///
    /// Nil related resources are skipped; relationships without a data rule
    /// map to an empty list.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a data rule.
    fn related_instances(
        &self,
        include: &BTreeSet<String>,
    ) -> Result<RelatedInstances<'_>, RenderError>;

    /// Returns the resource identifier, or `None` for a nil resource.
    fn linkage(&self) -> Option<ResourceIdentifier> {
        if self.is_nil() {
            None
        } else {
            Some(ResourceIdentifier::new(self.jsonapi_type(), self.jsonapi_id()))
        }
    }
}

/// A [`Blueprint`] bound to one model, or to no model at all.
///
/// The id, type, meta, resource links and relationship links and meta are
/// computed when the instance is built. Attributes are computed the first
/// time they are rendered and cached for the life of the instance, so
/// rendering twice yields the same attribute values.
///
/// A `Resource` caches through [`OnceCell`] and is therefore not `Sync`.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use jsonapi_serializable::{Blueprint, Context, RenderOptions, Resource, Serializable};
/// use serde_json::json;
///
/// struct User { id: u64, name: String }
///
/// let users = Arc::new(
///     Blueprint::<User>::builder("users")
///         .id(|scope| Ok(scope.model().id))
///         .attribute("name", |scope| Ok(scope.model().name.clone()))
///         .build()
///         .unwrap(),
/// );
///
/// let user = User { id: 1, name: "Lucas".to_string() };
/// let resource = Resource::new(users, &user, Context::new()).unwrap();
///
/// assert_eq!(
///     resource.render(&RenderOptions::default()).unwrap(),
///     json!({ "id": "1", "type": "users", "attributes": { "name": "Lucas" } })
/// );
/// ```
pub struct Resource<'a, M> {
    blueprint: Arc<Blueprint<M>>,
    scope: Option<Scope<'a, M>>,
    id: String,
    resource_type: String,
    meta: Option<Value>,
    links: Map<String, Value>,
    relationships: Vec<(String, RelationshipState<M>)>,
    attributes: Vec<OnceCell<Value>>,
}

impl<'a, M> Resource<'a, M> {
    /// Binds `blueprint` to `model`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the id, type, meta or link rules,
    /// or by a relationship's link or meta rules.
    pub fn new(
        blueprint: Arc<Blueprint<M>>,
        model: &'a M,
        context: Context,
    ) -> Result<Self, RenderError> {
        let scope = Scope::new(model, context, blueprint.api_version.clone());

        let id = (blueprint.id)(&scope)?;
        let resource_type = match &blueprint.type_rule {
            Some(TypeRule::Fixed(value)) => value.clone(),
            Some(TypeRule::Computed(rule)) => rule(&scope)?,
            None => blueprint.name.clone(),
        };
        let meta = blueprint
            .meta
            .as_ref()
            .map(|rule| rule.evaluate(&scope))
            .transpose()?
            .filter(|meta| !meta.is_null());
        let links = evaluate_links(&blueprint.links, &scope)?;
        let relationships = blueprint
            .relationships
            .iter()
            .map(|(name, decl)| {
                RelationshipState::new(Arc::clone(decl), &scope).map(|state| (name.clone(), state))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let attributes = blueprint.attributes.iter().map(|_| OnceCell::new()).collect();

        Ok(Self {
            blueprint,
            scope: Some(scope),
            id,
            resource_type,
            meta,
            links,
            relationships,
            attributes,
        })
    }

    /// Creates a resource that wraps no model and renders as `null`.
    ///
    /// No rule runs. The type is the blueprint's fixed type, or its name when
    /// the type is computed.
    #[must_use]
    pub fn nil(blueprint: Arc<Blueprint<M>>) -> Self {
        let resource_type = blueprint
            .fixed_type()
            .unwrap_or(blueprint.name())
            .to_string();

        Self {
            blueprint,
            scope: None,
            id: String::new(),
            resource_type,
            meta: None,
            links: Map::new(),
            relationships: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Binds `blueprint` to `model` if present, or builds a nil resource.
    ///
    /// # Errors
    ///
    /// See [`Resource::new`].
    pub fn from_option(
        blueprint: Arc<Blueprint<M>>,
        model: Option<&'a M>,
        context: Context,
    ) -> Result<Self, RenderError> {
        match model {
            Some(model) => Self::new(blueprint, model, context),
            None => Ok(Self::nil(blueprint)),
        }
    }

    /// Returns the wrapped model, if any.
    #[must_use]
    pub fn model(&self) -> Option<&'a M> {
        self.scope.as_ref().map(Scope::model)
    }

    /// Returns the context the instance was built with, if it wraps a model.
    #[must_use]
    pub fn context(&self) -> Option<&Context> {
        self.scope.as_ref().map(Scope::context)
    }

    /// Returns the blueprint this instance renders with.
    #[must_use]
    pub const fn blueprint(&self) -> &Arc<Blueprint<M>> {
        &self.blueprint
    }

    /// Returns the value of a declared attribute, computing it on first use.
    ///
    /// Returns `Ok(None)` for undeclared attributes and for nil resources.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the attribute's rule.
    pub fn attribute(&self, name: &str) -> Result<Option<&Value>, RenderError> {
        let Some(scope) = &self.scope else {
            return Ok(None);
        };
        let Some(index) = self.blueprint.attributes.get_index_of(name) else {
            return Ok(None);
        };

        match (
            self.blueprint.attributes.get_index(index),
            self.attributes.get(index),
        ) {
            (Some((name, rule)), Some(cell)) => memoized(cell, name, rule, scope).map(Some),
            _ => Ok(None),
        }
    }

    fn render_attributes(
        &self,
        scope: &Scope<'a, M>,
        options: &RenderOptions,
    ) -> Result<Map<String, Value>, RenderError> {
        let mut attributes = Map::new();
        for ((name, rule), cell) in self.blueprint.attributes.iter().zip(&self.attributes) {
            if options.selects(name) {
                let value = memoized(cell, name, rule, scope)?;
                attributes.insert(name.clone(), value.clone());
            }
        }
        Ok(attributes)
    }

    fn render_relationships(
        &self,
        scope: &Scope<'a, M>,
        options: &RenderOptions,
    ) -> Result<Map<String, Value>, RenderError> {
        let mut relationships = Map::new();
        for (name, state) in &self.relationships {
            if !options.selects(name) {
                continue;
            }
            let rendered = state.render(name, scope, options.includes(name))?;
            if !rendered.is_empty() {
                relationships.insert(name.clone(), Value::Object(rendered));
            }
        }
        Ok(relationships)
    }
}

fn memoized<'c, M>(
    cell: &'c OnceCell<Value>,
    name: &str,
    rule: &ValueRule<M>,
    scope: &Scope<'_, M>,
) -> Result<&'c Value, RenderError> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    tracing::trace!(attribute = name, "computing attribute");
    let value = rule(scope)?;
    Ok(cell.get_or_init(|| value))
}

impl<'a, M> Serializable for Resource<'a, M> {
    fn jsonapi_type(&self) -> &str {
        &self.resource_type
    }

    fn jsonapi_id(&self) -> &str {
        &self.id
    }

    fn is_nil(&self) -> bool {
        self.scope.is_none()
    }

    fn render(&self, options: &RenderOptions) -> Result<Value, RenderError> {
        let Some(scope) = &self.scope else {
            return Ok(Value::Null);
        };

        let mut rendered = Map::new();
        rendered.insert("id".to_string(), Value::String(self.id.clone()));
        rendered.insert("type".to_string(), Value::String(self.resource_type.clone()));

        let attributes = self.render_attributes(scope, options)?;
        if !attributes.is_empty() {
            rendered.insert("attributes".to_string(), Value::Object(attributes));
        }
        let relationships = self.render_relationships(scope, options)?;
        if !relationships.is_empty() {
            rendered.insert("relationships".to_string(), Value::Object(relationships));
        }
        if !self.links.is_empty() {
            rendered.insert("links".to_string(), Value::Object(self.links.clone()));
        }
        if let Some(meta) = &self.meta {
            rendered.insert("meta".to_string(), meta.clone());
        }

        Ok(Value::Object(rendered))
    }

    fn related_instances(
        &self,
        include: &BTreeSet<String>,
    ) -> Result<RelatedInstances<'_>, RenderError> {
        let mut related = RelatedInstances::new();
        let Some(scope) = &self.scope else {
            return Ok(related);
        };

        for (name, state) in &self.relationships {
            if !include.contains(name) {
                continue;
            }
            let resources = match state.data(scope)? {
                Some(data) => data.into_resources(),
                None => Vec::new(),
            };
            related.insert(name.clone(), resources);
        }
        Ok(related)
    }
}

impl<M> fmt::Debug for Resource<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("blueprint", &self.blueprint.name())
            .field("type", &self.resource_type)
            .field("id", &self.id)
            .field("nil", &self.scope.is_none())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::RelationshipData;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Shelf {
        id: u32,
        books: Vec<Book>,
    }

    struct Book {
        id: u32,
        title: String,
    }

    fn books() -> Arc<Blueprint<Book>> {
        Arc::new(
            Blueprint::<Book>::builder("books")
                .id(|scope| Ok(scope.model().id))
                .attribute("title", |scope| Ok(scope.model().title.clone()))
                .build()
                .unwrap(),
        )
    }

    fn shelves(books: Arc<Blueprint<Book>>) -> Arc<Blueprint<Shelf>> {
        Arc::new(
            Blueprint::<Shelf>::builder("shelves")
                .id(|scope| Ok(scope.model().id))
                .relationship("books", move |rel| {
                    rel.data(move |scope| {
                        let resources = scope
                            .model()
                            .books
                            .iter()
                            .map(|book| {
                                Resource::new(Arc::clone(&books), book, scope.context().clone())
                            })
                            .collect::<Result<Vec<_>, _>>()?;
                        Ok(RelationshipData::many(resources))
                    })
                })
                .build()
                .unwrap(),
        )
    }

    fn shelf() -> Shelf {
        Shelf {
            id: 3,
            books: vec![
                Book {
                    id: 1,
                    title: "Dune".to_string(),
                },
                Book {
                    id: 2,
                    title: "Emma".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_attributes_are_computed_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let blueprint = Arc::new(
            Blueprint::<Book>::builder("books")
                .id(|scope| Ok(scope.model().id))
                .attribute("title", move |scope| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(scope.model().title.clone())
                })
                .build()
                .unwrap(),
        );
        let book = Book {
            id: 1,
            title: "Dune".to_string(),
        };
        let resource = Resource::new(blueprint, &book, Context::new()).unwrap();

        let first = resource.render(&RenderOptions::default()).unwrap();
        let second = resource.render(&RenderOptions::default()).unwrap();
        assert_eq!(resource.attribute("title").unwrap(), Some(&json!("Dune")));

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unselected_attributes_are_not_computed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let blueprint = Arc::new(
            Blueprint::<Book>::builder("books")
                .id(|scope| Ok(scope.model().id))
                .attribute("title", move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok("x")
                })
                .build()
                .unwrap(),
        );
        let book = Book {
            id: 1,
            title: String::new(),
        };
        let resource = Resource::new(blueprint, &book, Context::new()).unwrap();

        let rendered = resource
            .render(&RenderOptions::new().fields(["other"]))
            .unwrap();

        assert_eq!(rendered, json!({ "id": "1", "type": "books" }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_nil_resource_renders_null() {
        let resource = Resource::<Book>::nil(books());

        assert!(resource.is_nil());
        assert!(resource.model().is_none());
        assert_eq!(resource.jsonapi_type(), "books");
        assert_eq!(resource.jsonapi_id(), "");
        assert!(resource.linkage().is_none());
        assert_eq!(
            resource.render(&RenderOptions::default()).unwrap(),
            Value::Null
        );
        assert!(resource.attribute("title").unwrap().is_none());
    }

    #[test]
    fn test_included_to_many_renders_array() {
        let shelf = shelf();
        let resource = Resource::new(shelves(books()), &shelf, Context::new()).unwrap();

        let rendered = resource
            .render(&RenderOptions::new().include(["books"]))
            .unwrap();

        assert_eq!(
            rendered["relationships"]["books"]["data"],
            json!([
                { "id": "1", "type": "books", "attributes": { "title": "Dune" } },
                { "id": "2", "type": "books", "attributes": { "title": "Emma" } }
            ])
        );
    }

    #[test]
    fn test_related_instances_only_for_requested_relationships() {
        let shelf = shelf();
        let resource = Resource::new(shelves(books()), &shelf, Context::new()).unwrap();

        let none = resource.related_instances(&BTreeSet::new()).unwrap();
        assert!(none.is_empty());

        let include: BTreeSet<String> = ["books".to_string()].into_iter().collect();
        let related = resource.related_instances(&include).unwrap();
        let ids: Vec<&str> = related["books"].iter().map(|r| r.jsonapi_id()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_computed_type_and_null_meta() {
        let blueprint = Arc::new(
            Blueprint::<Book>::builder("books")
                .id(|scope| Ok(scope.model().id))
                .type_with(|scope| Ok(format!("books_{}", scope.model().id)))
                .meta_with(|_| Ok(Value::Null))
                .build()
                .unwrap(),
        );
        let book = Book {
            id: 4,
            title: String::new(),
        };
        let resource = Resource::new(Arc::clone(&blueprint), &book, Context::new()).unwrap();

        assert_eq!(resource.jsonapi_type(), "books_4");
        assert_eq!(
            resource.render(&RenderOptions::default()).unwrap(),
            json!({ "id": "4", "type": "books_4" })
        );
        assert_eq!(Resource::nil(blueprint).jsonapi_type(), "books");
    }

    #[test]
    fn test_construction_error_propagates() {
        let blueprint = Arc::new(
            Blueprint::<Book>::builder("books")
                .id(|_| Err::<u32, _>(RenderError::computation("no id")))
                .build()
                .unwrap(),
        );
        let book = Book {
            id: 1,
            title: String::new(),
        };

        let error = Resource::new(blueprint, &book, Context::new()).unwrap_err();
        assert_eq!(error.to_string(), "no id");
    }
}
