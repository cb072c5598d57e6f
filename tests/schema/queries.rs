//! Integration tests for structural queries
//!
//! Tests parentage, descent, and child classification against a schema
//! exercising every child shape at once.

use canopy_foundation::{TreePath, TypeRegistry};
use canopy_graph::NodeId;
use canopy_schema::{query, ChildSlot, CompiledSchema, DeclarationBag, SchemaBuilder};

fn inventory() -> CompiledSchema {
    let mut bag = DeclarationBag::new();
    bag.set_application_name("inventory");
    bag.aggregate(TreePath::root("Warehouse"));
    bag.member(TreePath::parse("/Warehouse/Code").unwrap())
        .member_type("word")
        .key();
    bag.member(TreePath::parse("/Warehouse/Name").unwrap())
        .member_type("word")
        .display_name();
    bag.aggregate(TreePath::parse("/Warehouse/Shelf").unwrap()).array();
    bag.member(TreePath::parse("/Warehouse/Shelf/No").unwrap())
        .member_type("int")
        .key();
    bag.aggregate(TreePath::parse("/Warehouse/Shelf/Bin").unwrap()).array();
    bag.member(TreePath::parse("/Warehouse/Shelf/Bin/Slot").unwrap())
        .member_type("int")
        .key();
    bag.aggregate(TreePath::parse("/Warehouse/Office").unwrap());
    bag.aggregate(TreePath::parse("/Warehouse/Manual").unwrap())
        .variation("StorageKind", "1");
    bag.aggregate(TreePath::parse("/Warehouse/Automated").unwrap())
        .variation("StorageKind", "2");
    SchemaBuilder::build(&bag, &TypeRegistry::default()).unwrap()
}

// =============================================================================
// Parents, Roots, Descent
// =============================================================================

#[test]
fn ancestry_runs_root_first() {
    let schema = inventory();
    let bin = NodeId::new("/Warehouse/Shelf/Bin");
    let chain: Vec<&str> = query::ancestors_of(schema.graph(), &bin)
        .iter()
        .map(|aggregate| aggregate.id.as_str())
        .collect();
    assert_eq!(chain, vec!["/Warehouse", "/Warehouse/Shelf"]);
}

#[test]
fn root_of_any_node_is_the_tree_root() {
    let schema = inventory();
    let bin = NodeId::new("/Warehouse/Shelf/Bin");
    let warehouse = NodeId::new("/Warehouse");
    assert_eq!(
        query::root_of(schema.graph(), &bin).unwrap().id,
        warehouse
    );
    assert_eq!(
        query::root_of(schema.graph(), &warehouse).unwrap().id,
        warehouse
    );
}

#[test]
fn descendants_enumerate_the_whole_subtree() {
    let schema = inventory();
    let warehouse = NodeId::new("/Warehouse");
    let all = query::descendants_of(schema.graph(), &warehouse);
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].id, warehouse);
}

#[test]
fn every_non_root_has_exactly_one_parent_edge() {
    let schema = inventory();
    for aggregate in schema.graph().aggregates() {
        let parents = schema
            .graph()
            .edges_into(&aggregate.id)
            .filter(|edge| edge.kind == canopy_graph::EdgeKind::ParentChild)
            .count();
        let expected = usize::from(aggregate.id.as_str() != "/Warehouse");
        assert_eq!(parents, expected, "aggregate {}", aggregate.id);
    }
}

// =============================================================================
// Child Classification
// =============================================================================

#[test]
fn children_cover_all_three_shapes() {
    let schema = inventory();
    let warehouse = NodeId::new("/Warehouse");
    let children = query::children_of(schema.graph(), &warehouse);
    assert_eq!(children.len(), 4);

    let collections = children
        .iter()
        .filter(|slot| matches!(slot, ChildSlot::Collection(_)))
        .count();
    let singles = children
        .iter()
        .filter(|slot| matches!(slot, ChildSlot::Single(_)))
        .count();
    let variants = children
        .iter()
        .filter(|slot| matches!(slot, ChildSlot::Variant { .. }))
        .count();
    assert_eq!((collections, singles, variants), (1, 1, 2));
}

#[test]
fn variation_groups_preserve_declaration_order() {
    let schema = inventory();
    let warehouse = NodeId::new("/Warehouse");
    let groups = query::variation_groups_of(schema.graph(), &warehouse);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].group, "StorageKind");
    let switches: Vec<&str> = groups[0]
        .variants
        .iter()
        .map(|(switch, _)| switch.as_str())
        .collect();
    assert_eq!(switches, vec!["1", "2"]);
}

#[test]
fn members_keep_declaration_order_with_flags() {
    let schema = inventory();
    let warehouse = NodeId::new("/Warehouse");
    let members = query::members_of(schema.graph(), &warehouse);
    assert_eq!(members.len(), 2);
    assert!(members[0].is_key);
    assert!(members[1].is_display_name);
}
