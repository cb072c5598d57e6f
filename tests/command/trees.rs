//! Integration tests for key and command trees
//!
//! Tests tree shapes per operation against a schema with nesting,
//! references, and an auto-assigned key.

use canopy_command::{command_tree_of, key_tree_of, CommandNode, KeyNode, MutationKind};
use canopy_foundation::{TreePath, TypeRegistry};
use canopy_graph::NodeId;
use canopy_schema::{CompiledSchema, DeclarationBag, SchemaBuilder};

fn shop() -> CompiledSchema {
    let mut bag = DeclarationBag::new();
    bag.set_application_name("shop");
    bag.aggregate(TreePath::root("Customer"));
    bag.member(TreePath::parse("/Customer/CustomerId").unwrap())
        .member_type("int")
        .key();
    bag.aggregate(TreePath::root("Order"));
    bag.member(TreePath::parse("/Order/Id").unwrap())
        .member_type("sequence")
        .key();
    bag.member(TreePath::parse("/Order/Note").unwrap())
        .member_type("sentence");
    bag.member(TreePath::parse("/Order/Buyer").unwrap())
        .ref_to("/Customer");
    bag.aggregate(TreePath::parse("/Order/Line").unwrap()).array();
    bag.member(TreePath::parse("/Order/Line/Seq").unwrap())
        .member_type("int")
        .key();
    bag.member(TreePath::parse("/Order/Line/Qty").unwrap())
        .member_type("int");
    SchemaBuilder::build(&bag, &TypeRegistry::default()).unwrap()
}

// =============================================================================
// Key Trees
// =============================================================================

#[test]
fn nested_key_tree_embeds_the_parent_once() {
    let schema = shop();
    let tree = key_tree_of(schema.graph(), &NodeId::new("/Order/Line")).unwrap();
    let parents = tree
        .nodes
        .iter()
        .filter(|node| matches!(node, KeyNode::Parent { .. }))
        .count();
    assert_eq!(parents, 1);
    assert_eq!(tree.nodes.len(), 2);
}

// =============================================================================
// Command Trees Per Operation
// =============================================================================

#[test]
fn create_drops_the_sequence_key_but_keeps_the_reference() {
    let schema = shop();
    let tree =
        command_tree_of(schema.graph(), &NodeId::new("/Order"), MutationKind::Create).unwrap();
    assert!(!tree
        .nodes
        .iter()
        .any(|node| matches!(node, CommandNode::Value { name, .. } if name == "Id")));
    assert!(tree
        .nodes
        .iter()
        .any(|node| matches!(node, CommandNode::Reference { via, .. } if via == "Buyer")));
}

#[test]
fn update_and_delete_end_with_a_version_token() {
    let schema = shop();
    for operation in [MutationKind::Update, MutationKind::Delete] {
        let tree = command_tree_of(schema.graph(), &NodeId::new("/Order"), operation).unwrap();
        assert!(
            matches!(tree.nodes.last(), Some(CommandNode::Version)),
            "operation {operation:?}"
        );
    }
}

#[test]
fn delete_is_keys_only() {
    let schema = shop();
    let tree =
        command_tree_of(schema.graph(), &NodeId::new("/Order"), MutationKind::Delete).unwrap();
    // Key member, then version token. No children, no non-key reference.
    assert_eq!(tree.nodes.len(), 2);
    assert!(matches!(
        &tree.nodes[0],
        CommandNode::Value { name, .. } if name == "Id"
    ));
}

#[test]
fn collections_nest_recursively_per_operation() {
    let schema = shop();
    let tree =
        command_tree_of(schema.graph(), &NodeId::new("/Order"), MutationKind::Update).unwrap();
    let line = tree
        .nodes
        .iter()
        .find_map(|node| match node {
            CommandNode::Collection { tree, .. } => Some(tree),
            _ => None,
        })
        .unwrap();
    assert_eq!(line.operation, MutationKind::Update);
    assert_eq!(line.aggregate, NodeId::new("/Order/Line"));
    assert!(!line
        .nodes
        .iter()
        .any(|node| matches!(node, CommandNode::Version)));
}
