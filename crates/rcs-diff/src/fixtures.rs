//! Shared test mapping: carts with an order and a list of cart items.

use std::sync::Arc;

use rcs_mapping::attribute::{TYPE_INTEGER, TYPE_OBJECT};
use rcs_mapping::{Attribute, ClassMetadata, Mapping, MappingConfig, Relation};

fn class(key: &str, attributes: Vec<Attribute>, relations: Vec<Relation>) -> ClassMetadata {
    let mut meta = ClassMetadata::new(key).with_path_root(format!("/v1/{key}"));
    meta.set_attribute_list(attributes).unwrap();
    meta.set_relation_list(relations).unwrap();
    meta
}

pub(crate) fn cart_mapping() -> Arc<Mapping> {
    let carts = class(
        "carts",
        vec![
            Attribute::identifier("@id").named("id"),
            Attribute::new("status"),
            Attribute::new("clientPhoneNumber"),
            Attribute::new("data").with_type(TYPE_OBJECT),
        ],
        vec![
            Relation::many_to_one("orders", "order"),
            Relation::one_to_many("cart_items", "cartItemList"),
        ],
    );
    let orders = class(
        "orders",
        vec![
            Attribute::identifier("@id").named("id"),
            Attribute::new("status"),
            Attribute::new("customerPaidAmount").with_type(TYPE_INTEGER),
        ],
        vec![],
    );
    let cart_items = class(
        "cart_items",
        vec![
            Attribute::identifier("@id").named("id"),
            Attribute::new("quantity").with_type(TYPE_INTEGER),
            Attribute::new("amount").with_type(TYPE_INTEGER),
        ],
        vec![
            Relation::many_to_one("carts", "cart"),
            Relation::many_to_one("products", "product"),
        ],
    );
    let products = class(
        "products",
        vec![Attribute::identifier("@id").named("id"), Attribute::new("name")],
        vec![],
    );
    let broken = class(
        "broken",
        vec![Attribute::identifier("@id")],
        vec![
            Relation::many_to_one("nowhere", "nowhere"),
            Relation::one_to_many("nowhere", "nowhereList"),
        ],
    );

    Arc::new(
        Mapping::new("/v1", MappingConfig::default())
            .with_classes(vec![carts, orders, cart_items, products, broken]),
    )
}
