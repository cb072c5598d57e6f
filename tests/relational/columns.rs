//! Integration tests for column projection
//!
//! Tests key inheritance through parents and references, fixed column
//! ordering, and the no-deduplication rule for multi-path keys.

use canopy_foundation::{TreePath, TypeRegistry};
use canopy_graph::NodeId;
use canopy_relational::{columns_of, primary_key_of, ColumnRole, RelationalColumn};
use canopy_schema::{CompiledSchema, DeclarationBag, SchemaBuilder};

fn build(bag: &DeclarationBag) -> CompiledSchema {
    SchemaBuilder::build(bag, &TypeRegistry::default()).unwrap()
}

fn names(columns: &[RelationalColumn]) -> Vec<String> {
    columns.iter().map(RelationalColumn::physical_name).collect()
}

// =============================================================================
// Key Inheritance
// =============================================================================

#[test]
fn collection_child_inherits_the_root_key() {
    let mut bag = DeclarationBag::new();
    bag.set_application_name("shop");
    bag.aggregate(TreePath::root("Order"));
    bag.member(TreePath::parse("/Order/Id").unwrap())
        .member_type("int")
        .key();
    bag.aggregate(TreePath::parse("/Order/Line").unwrap()).array();
    bag.member(TreePath::parse("/Order/Line/Qty").unwrap())
        .member_type("int");
    let schema = build(&bag);

    assert_eq!(
        names(&columns_of(schema.graph(), &NodeId::new("/Order")).unwrap()),
        vec!["Id"]
    );
    assert_eq!(
        names(&columns_of(schema.graph(), &NodeId::new("/Order/Line")).unwrap()),
        vec!["Order_Id", "Qty"]
    );
}

#[test]
fn three_level_hierarchy_prefixes_root_to_leaf_without_collisions() {
    let mut bag = DeclarationBag::new();
    bag.set_application_name("deep");
    bag.aggregate(TreePath::root("Root"));
    bag.member(TreePath::parse("/Root/K").unwrap())
        .member_type("int")
        .key();
    bag.aggregate(TreePath::parse("/Root/Child").unwrap()).array();
    bag.member(TreePath::parse("/Root/Child/Q").unwrap())
        .member_type("int")
        .key();
    bag.aggregate(TreePath::parse("/Root/Child/Grandchild").unwrap())
        .array();
    bag.member(TreePath::parse("/Root/Child/Grandchild/V").unwrap())
        .member_type("word");
    let schema = build(&bag);

    let grandchild = columns_of(schema.graph(), &NodeId::new("/Root/Child/Grandchild")).unwrap();
    let physical = names(&grandchild);
    assert_eq!(physical, vec!["Root_Child_K", "Child_Q", "V"]);

    let unique: std::collections::HashSet<&String> = physical.iter().collect();
    assert_eq!(unique.len(), physical.len());
}

#[test]
fn reference_key_is_prefixed_by_the_member_name() {
    let mut bag = DeclarationBag::new();
    bag.set_application_name("shop");
    bag.aggregate(TreePath::root("Customer"));
    bag.member(TreePath::parse("/Customer/CustomerId").unwrap())
        .member_type("int")
        .key();
    bag.aggregate(TreePath::root("Order"));
    bag.member(TreePath::parse("/Order/Id").unwrap())
        .member_type("int")
        .key();
    bag.member(TreePath::parse("/Order/Buyer").unwrap())
        .ref_to("/Customer");
    let schema = build(&bag);

    let order = columns_of(schema.graph(), &NodeId::new("/Order")).unwrap();
    let buyer = order
        .iter()
        .find(|column| matches!(&column.role, ColumnRole::RefKey { via } if via == "Buyer"))
        .unwrap();
    assert_eq!(buyer.physical_name(), "Buyer_CustomerId");
}

#[test]
fn every_target_key_column_is_re_emitted_per_reference() {
    let mut bag = DeclarationBag::new();
    bag.set_application_name("shop");
    bag.aggregate(TreePath::root("Customer"));
    bag.member(TreePath::parse("/Customer/Region").unwrap())
        .member_type("word")
        .key();
    bag.member(TreePath::parse("/Customer/Serial").unwrap())
        .member_type("int")
        .key();
    bag.aggregate(TreePath::root("Order"));
    bag.member(TreePath::parse("/Order/Id").unwrap())
        .member_type("int")
        .key();
    bag.member(TreePath::parse("/Order/Buyer").unwrap())
        .ref_to("/Customer");
    let schema = build(&bag);

    let target_key = primary_key_of(schema.graph(), &NodeId::new("/Customer")).unwrap();
    let order = columns_of(schema.graph(), &NodeId::new("/Order")).unwrap();
    let ref_keys: Vec<&RelationalColumn> = order
        .iter()
        .filter(|column| matches!(&column.role, ColumnRole::RefKey { .. }))
        .collect();
    assert_eq!(ref_keys.len(), target_key.len());
    for (ref_key, key) in ref_keys.iter().zip(&target_key) {
        assert_eq!(ref_key.origin, key.origin);
    }
}

// =============================================================================
// Ordering and Multi-Path Keys
// =============================================================================

#[test]
fn section_order_is_parent_own_ref_discriminator() {
    let mut bag = DeclarationBag::new();
    bag.set_application_name("shop");
    bag.aggregate(TreePath::root("Partner"));
    bag.member(TreePath::parse("/Partner/Code").unwrap())
        .member_type("word")
        .key();
    bag.aggregate(TreePath::root("Order"));
    bag.member(TreePath::parse("/Order/Id").unwrap())
        .member_type("int")
        .key();
    bag.aggregate(TreePath::parse("/Order/Detail").unwrap()).array();
    bag.member(TreePath::parse("/Order/Detail/Qty").unwrap())
        .member_type("int");
    bag.member(TreePath::parse("/Order/Detail/Supplier").unwrap())
        .ref_to("/Partner");
    bag.aggregate(TreePath::parse("/Order/Detail/Fresh").unwrap())
        .variation("Stock", "1");
    bag.aggregate(TreePath::parse("/Order/Detail/Frozen").unwrap())
        .variation("Stock", "2");
    let schema = build(&bag);

    let detail = columns_of(schema.graph(), &NodeId::new("/Order/Detail")).unwrap();
    let roles: Vec<&ColumnRole> = detail.iter().map(|column| &column.role).collect();
    assert!(matches!(roles[0], ColumnRole::ParentKey));
    assert!(matches!(roles[1], ColumnRole::Own));
    assert!(matches!(roles[2], ColumnRole::RefKey { .. }));
    assert!(matches!(roles[3], ColumnRole::Discriminator));
    assert_eq!(roles.len(), 4);
}

#[test]
fn same_origin_via_ancestor_and_reference_stays_two_columns() {
    // Line inherits Order's key and also references Order directly. The
    // same origin member appears twice under two names.
    let mut bag = DeclarationBag::new();
    bag.set_application_name("shop");
    bag.aggregate(TreePath::root("Order"));
    bag.member(TreePath::parse("/Order/Id").unwrap())
        .member_type("int")
        .key();
    bag.aggregate(TreePath::parse("/Order/Line").unwrap()).array();
    bag.member(TreePath::parse("/Order/Line/Original").unwrap())
        .ref_to("/Order");
    let schema = build(&bag);

    let line = columns_of(schema.graph(), &NodeId::new("/Order/Line")).unwrap();
    assert_eq!(names(&line), vec!["Order_Id", "Original_Id"]);
    assert_eq!(line[0].origin, line[1].origin);
}

#[test]
fn projection_is_deterministic() {
    let mut bag = DeclarationBag::new();
    bag.set_application_name("shop");
    bag.aggregate(TreePath::root("Order"));
    bag.member(TreePath::parse("/Order/Id").unwrap())
        .member_type("int")
        .key();
    bag.aggregate(TreePath::parse("/Order/Line").unwrap()).array();
    bag.member(TreePath::parse("/Order/Line/Qty").unwrap())
        .member_type("int");
    let schema = build(&bag);

    let line = NodeId::new("/Order/Line");
    let first = columns_of(schema.graph(), &line).unwrap();
    let second = columns_of(schema.graph(), &line).unwrap();
    assert_eq!(first, second);
}
