//! Integration tests for related-blueprint inference.

use jsonapi_serializable::{
    ApiVersion, Blueprint, BlueprintRegistry, ConfigError, Context, NamingConvention, Related,
    RenderError, RenderOptions, Resource, ResourceModel, Serializable,
};
use serde_json::json;
use std::sync::Arc;

struct Customer {
    id: u32,
    name: String,
}

struct Order {
    id: u32,
    customer: Option<Customer>,
    items: Vec<LineItem>,
}

struct LineItem {
    sku: String,
}

impl ResourceModel for Customer {
    type Id = u32;
    const NAME: &'static str = "Customer";
    const NAMESPACE: Option<&'static str> = Some("Shop");

    fn get_id(&self) -> u32 {
        self.id
    }
}

impl ResourceModel for Order {
    type Id = u32;
    const NAME: &'static str = "Order";
    const NAMESPACE: Option<&'static str> = Some("Shop");

    fn get_id(&self) -> u32 {
        self.id
    }
}

impl ResourceModel for LineItem {
    type Id = String;
    const NAME: &'static str = "LineItem";

    fn get_id(&self) -> String {
        self.sku.clone()
    }
}

fn order() -> Order {
    Order {
        id: 100,
        customer: Some(Customer {
            id: 5,
            name: "Grace".to_string(),
        }),
        items: vec![
            LineItem {
                sku: "A-1".to_string(),
            },
            LineItem {
                sku: "B-2".to_string(),
            },
        ],
    }
}

fn v1() -> ApiVersion {
    ApiVersion::new("V1").unwrap()
}

fn orders() -> Arc<Blueprint<Order>> {
    Arc::new(
        Blueprint::<Order>::for_model()
            .api_version(v1())
            .has_one("customer", Related::<Customer>::Inferred, |order| {
                order.customer.as_ref()
            })
            .has_many("items", Related::<LineItem>::Inferred, |order| {
                order.items.iter().collect()
            })
            .build()
            .unwrap(),
    )
}

fn registry() -> BlueprintRegistry {
    let mut registry = BlueprintRegistry::new();
    registry
        .register(
            Some(&v1()),
            Arc::new(
                Blueprint::<Customer>::for_model()
                    .attribute("name", |scope| Ok(scope.model().name.clone()))
                    .build()
                    .unwrap(),
            ),
        )
        .unwrap()
        .register(
            Some(&v1()),
            Arc::new(Blueprint::<LineItem>::for_model().build().unwrap()),
        )
        .unwrap();
    registry
}

// =============================================================================
// Conventional Names
// =============================================================================

#[test]
fn test_expected_names_include_namespace_and_version() {
    let registry = registry();

    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["Shop::V1::SerializableCustomer", "V1::SerializableLineItem"]
    );
    assert_eq!(
        registry.expected_name::<Order>(None).unwrap(),
        "Shop::SerializableOrder"
    );
}

#[test]
fn test_version_parsed_case_insensitively() {
    let version: ApiVersion = "v1".parse().unwrap();

    assert_eq!(version, v1());
    assert_eq!(version.number(), Some(1));
    assert!(matches!(
        ApiVersion::new("1.0"),
        Err(ConfigError::InvalidApiVersion { .. })
    ));
}

// =============================================================================
// Resolution at Render Time
// =============================================================================

#[test]
fn test_inferred_relationships_resolve_through_context_registry() {
    let order = order();
    let context = Context::new().with_registry(Arc::new(registry()));
    let resource = Resource::new(orders(), &order, context).unwrap();

    let actual = resource
        .render(&RenderOptions::new().include(["customer"]))
        .unwrap();

    assert_eq!(
        actual,
        json!({
            "id": "100",
            "type": "Order",
            "relationships": {
                "customer": {
                    "data": { "id": "5", "type": "Customer", "attributes": { "name": "Grace" } }
                },
                "items": {
                    "data": [
                        { "type": "LineItem", "id": "A-1" },
                        { "type": "LineItem", "id": "B-2" }
                    ]
                }
            }
        })
    );
}

#[test]
fn test_missing_registry_entry_reports_expected_name() {
    let order = order();
    let mut registry = BlueprintRegistry::new();
    registry
        .register(None, Arc::new(Blueprint::<Customer>::for_model().build().unwrap()))
        .unwrap();
    let context = Context::new().with_registry(Arc::new(registry));

    // Construction does not touch relationship data
    let resource = Resource::new(orders(), &order, context).unwrap();
    let error = resource
        .render(&RenderOptions::new().fields(["customer"]))
        .unwrap_err();

    assert!(matches!(
        error,
        RenderError::Resolution { ref expected } if expected == "Shop::V1::SerializableCustomer"
    ));
    assert!(error.to_string().contains("Shop::V1::SerializableCustomer"));
}

#[test]
fn test_entry_for_another_model_type_is_a_miss() {
    let order = order();
    let mut registry = BlueprintRegistry::new();
    registry.insert(
        "Shop::V1::SerializableCustomer",
        Arc::new(Blueprint::<LineItem>::for_model().build().unwrap()),
    );
    let context = Context::new().with_registry(Arc::new(registry));
    let resource = Resource::new(orders(), &order, context).unwrap();

    let error = resource
        .render(&RenderOptions::new().fields(["customer"]))
        .unwrap_err();

    assert!(matches!(error, RenderError::Resolution { .. }));
}

#[test]
fn test_empty_relationships_need_no_registry() {
    let order = Order {
        id: 1,
        customer: None,
        items: Vec::new(),
    };
    let resource = Resource::new(orders(), &order, Context::new()).unwrap();

    let actual = resource.render(&RenderOptions::default()).unwrap();

    assert_eq!(
        actual["relationships"],
        json!({
            "customer": { "data": null },
            "items": { "data": [] }
        })
    );
}

#[test]
fn test_custom_naming_convention() {
    let convention = NamingConvention::builder()
        .prefix("")
        .separator(".")
        .build()
        .unwrap();
    let mut registry = BlueprintRegistry::with_convention(convention);
    registry
        .register(
            Some(&v1()),
            Arc::new(Blueprint::<LineItem>::for_model().build().unwrap()),
        )
        .unwrap();

    assert!(registry.contains("V1.LineItem"));
    assert!(registry.get::<LineItem>("V1.LineItem").is_some());
    assert!(!registry.is_empty());
}
