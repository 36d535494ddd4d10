//! Integration tests for blueprints declared without model conventions.

use jsonapi_serializable::{
    Blueprint, Context, Link, Linkage, RelationshipData, RenderError, RenderOptions, Resource,
    ResourceIdentifier, Serializable,
};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

struct Author {
    id: u32,
    name: String,
}

struct Article {
    id: u32,
    title: String,
    body: String,
    author: Author,
    comment_ids: Vec<u32>,
}

#[derive(Debug)]
struct UrlHelper {
    base: String,
}

impl UrlHelper {
    fn article_url(&self, id: u32) -> String {
        format!("{}/articles/{id}", self.base)
    }
}

fn article() -> Article {
    Article {
        id: 7,
        title: "Hello".to_string(),
        body: "World".to_string(),
        author: Author {
            id: 3,
            name: "Ada".to_string(),
        },
        comment_ids: vec![10, 11],
    }
}

fn authors() -> Arc<Blueprint<Author>> {
    Arc::new(
        Blueprint::<Author>::builder("authors")
            .id(|scope| Ok(scope.model().id))
            .attribute("name", |scope| Ok(scope.model().name.clone()))
            .build()
            .unwrap(),
    )
}

fn articles() -> Arc<Blueprint<Article>> {
    let authors = authors();
    Arc::new(
        Blueprint::<Article>::builder("articles")
            .id(|scope| Ok(scope.model().id))
            .attribute("title", |scope| Ok(scope.model().title.clone()))
            .attribute("body", |scope| Ok(scope.model().body.clone()))
            .relationship("author", move |rel| {
                rel.data(move |scope| {
                    let author = Resource::new(
                        Arc::clone(&authors),
                        &scope.model().author,
                        scope.context().clone(),
                    )?;
                    Ok(RelationshipData::one(author))
                })
                .link("related", |scope| {
                    Ok(format!("/articles/{}/author", scope.model().id))
                })
            })
            .relationship("comments", |rel| {
                rel.linkage_data(|scope| {
                    Ok(scope
                        .model()
                        .comment_ids
                        .iter()
                        .map(|id| ResourceIdentifier::new("comments", id.to_string()))
                        .collect::<Vec<_>>())
                })
                .meta_with(|scope| Ok(json!({ "count": scope.model().comment_ids.len() })))
            })
            .link("self", |scope| {
                let helper = scope.require::<UrlHelper>("url_helper")?;
                Ok(helper.article_url(scope.model().id))
            })
            .meta(json!({ "version": 1 }))
            .build()
            .unwrap(),
    )
}

fn context() -> Context {
    Context::new().with(
        "url_helper",
        UrlHelper {
            base: "https://api.example.com".to_string(),
        },
    )
}

// =============================================================================
// Full Rendering
// =============================================================================

#[test]
fn test_renders_full_resource_object() {
    let article = article();
    let resource = Resource::new(articles(), &article, context()).unwrap();

    let actual = resource.render(&RenderOptions::default()).unwrap();

    assert_eq!(
        actual,
        json!({
            "id": "7",
            "type": "articles",
            "attributes": { "title": "Hello", "body": "World" },
            "relationships": {
                "author": { "links": { "related": "/articles/7/author" } },
                "comments": {
                    "data": [
                        { "type": "comments", "id": "10" },
                        { "type": "comments", "id": "11" }
                    ],
                    "meta": { "count": 2 }
                }
            },
            "links": { "self": "https://api.example.com/articles/7" },
            "meta": { "version": 1 }
        })
    );
}

#[test]
fn test_included_relationship_keeps_links() {
    let article = article();
    let resource = Resource::new(articles(), &article, context()).unwrap();

    let actual = resource
        .render(&RenderOptions::new().include(["author"]))
        .unwrap();

    assert_eq!(
        actual["relationships"]["author"],
        json!({
            "data": { "id": "3", "type": "authors", "attributes": { "name": "Ada" } },
            "links": { "related": "/articles/7/author" }
        })
    );
}

// =============================================================================
// Field Selection
// =============================================================================

#[test]
fn test_fields_filter_attributes_and_relationships() {
    let article = article();
    let resource = Resource::new(articles(), &article, context()).unwrap();

    let actual = resource
        .render(&RenderOptions::new().fields(["title", "comments", "unknown"]))
        .unwrap();

    assert_eq!(actual["attributes"], json!({ "title": "Hello" }));
    let relationships = actual["relationships"].as_object().unwrap();
    assert_eq!(relationships.keys().collect::<Vec<_>>(), vec!["comments"]);
    assert!(actual.get("links").is_some());
    assert!(actual.get("meta").is_some());
}

#[test]
fn test_empty_fields_render_identity_links_and_meta_only() {
    let article = article();
    let resource = Resource::new(articles(), &article, context()).unwrap();

    let actual = resource
        .render(&RenderOptions::new().fields(Vec::<String>::new()))
        .unwrap();

    assert_eq!(
        actual,
        json!({
            "id": "7",
            "type": "articles",
            "links": { "self": "https://api.example.com/articles/7" },
            "meta": { "version": 1 }
        })
    );
}

// =============================================================================
// Links, Meta and Context
// =============================================================================

#[test]
fn test_structured_links() {
    let article = article();
    let blueprint = Arc::new(
        Blueprint::<Article>::builder("articles")
            .id(|scope| Ok(scope.model().id))
            .link("self", |scope| {
                Ok(Link::with_meta(
                    format!("/articles/{}", scope.model().id),
                    json!({ "canonical": true }),
                ))
            })
            .link("alternate", |_| Ok("/a/7"))
            .build()
            .unwrap(),
    );
    let resource = Resource::new(blueprint, &article, Context::new()).unwrap();

    let actual = resource.render(&RenderOptions::default()).unwrap();

    assert_eq!(
        actual["links"],
        json!({
            "self": { "href": "/articles/7", "meta": { "canonical": true } },
            "alternate": "/a/7"
        })
    );
}

#[test]
fn test_missing_context_value_fails_construction() {
    let article = article();

    let error = Resource::new(articles(), &article, Context::new()).unwrap_err();

    assert!(matches!(
        error,
        RenderError::MissingContext { ref key } if key == "url_helper"
    ));
}

#[test]
fn test_attribute_error_propagates_from_render() {
    let article = article();
    let blueprint = Arc::new(
        Blueprint::<Article>::builder("articles")
            .id(|scope| Ok(scope.model().id))
            .attribute("word_count", |scope| {
                if scope.model().body.is_empty() {
                    Ok(0)
                } else {
                    Err(RenderError::computation("word counter unavailable"))
                }
            })
            .build()
            .unwrap(),
    );
    let resource = Resource::new(blueprint, &article, Context::new()).unwrap();

    let error = resource.render(&RenderOptions::default()).unwrap_err();

    assert_eq!(error.to_string(), "word counter unavailable");
}

#[test]
fn test_relationship_without_output_is_omitted() {
    let article = article();
    let blueprint = Arc::new(
        Blueprint::<Article>::builder("articles")
            .id(|scope| Ok(scope.model().id))
            .relationship("tags", |rel| rel.meta(Value::Null))
            .build()
            .unwrap(),
    );
    let resource = Resource::new(blueprint, &article, Context::new()).unwrap();

    let actual = resource.render(&RenderOptions::new().include(["tags"])).unwrap();

    assert_eq!(actual, json!({ "id": "7", "type": "articles" }));
}

// =============================================================================
// Collaborator Interface
// =============================================================================

#[test]
fn test_related_instances_for_document_builders() {
    let article = article();
    let resource = Resource::new(articles(), &article, context()).unwrap();
    let include: BTreeSet<String> = ["author", "comments", "missing"]
        .into_iter()
        .map(String::from)
        .collect();

    let related = resource.related_instances(&include).unwrap();

    assert_eq!(related.len(), 2);
    assert!(related["comments"].is_empty());
    let author = &related["author"][0];
    assert_eq!(author.jsonapi_type(), "authors");
    assert_eq!(author.jsonapi_id(), "3");
    assert_eq!(
        author.linkage(),
        Some(ResourceIdentifier::new("authors", "3"))
    );
}

#[test]
fn test_identity_accessors() {
    let article = article();
    let resource = Resource::new(articles(), &article, context()).unwrap();

    assert_eq!(resource.jsonapi_type(), "articles");
    assert_eq!(resource.jsonapi_id(), "7");
    assert!(!resource.is_nil());
    assert_eq!(resource.model().map(|a| a.id), Some(7));
    assert!(resource.context().unwrap().contains_key("url_helper"));
}

#[test]
fn test_linkage_deserializes_from_json() {
    let linkage: Linkage =
        serde_json::from_value(json!([{ "type": "comments", "id": "1" }])).unwrap();

    assert_eq!(
        linkage,
        Linkage::Many(vec![ResourceIdentifier::new("comments", "1")])
    );
}
