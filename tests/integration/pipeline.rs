//! End-to-end pipeline tests
//!
//! One realistic schema driven through every derivation the core offers.

use canopy_command::{command_tree_of, key_tree_of, MutationKind};
use canopy_foundation::{TreePath, TypeRegistry};
use canopy_graph::NodeId;
use canopy_relational::{columns_of, navigations_of, DeleteBehavior};
use canopy_schema::{query, CompiledSchema, DeclarationBag, SchemaBuilder};

/// A sales schema touching every feature: nesting, collections, variation
/// groups, references, and an auto-assigned key.
fn sales() -> CompiledSchema {
    let mut bag = DeclarationBag::new();
    bag.set_application_name("sales");

    bag.aggregate(TreePath::root("Customer"));
    bag.member(TreePath::parse("/Customer/CustomerId").unwrap())
        .member_type("sequence")
        .key();
    bag.member(TreePath::parse("/Customer/Name").unwrap())
        .member_type("word")
        .display_name()
        .required();

    bag.aggregate(TreePath::root("Order"));
    bag.member(TreePath::parse("/Order/OrderId").unwrap())
        .member_type("sequence")
        .key();
    bag.member(TreePath::parse("/Order/OrderedAt").unwrap())
        .member_type("datetime")
        .required();
    bag.member(TreePath::parse("/Order/Buyer").unwrap())
        .ref_to("/Customer")
        .required();

    bag.aggregate(TreePath::parse("/Order/Line").unwrap()).array();
    bag.member(TreePath::parse("/Order/Line/Seq").unwrap())
        .member_type("int")
        .key();
    bag.member(TreePath::parse("/Order/Line/Qty").unwrap())
        .member_type("int")
        .required();

    bag.aggregate(TreePath::parse("/Order/Cash").unwrap())
        .variation("Payment", "1");
    bag.member(TreePath::parse("/Order/Cash/Tendered").unwrap())
        .member_type("decimal");
    bag.aggregate(TreePath::parse("/Order/Card").unwrap())
        .variation("Payment", "2");
    bag.member(TreePath::parse("/Order/Card/Brand").unwrap())
        .member_type("word");

    SchemaBuilder::build(&bag, &TypeRegistry::default()).unwrap()
}

#[test]
fn the_whole_pipeline_holds_together() {
    let schema = sales();
    let graph = schema.graph();
    assert_eq!(schema.application_name(), "sales");
    assert_eq!(schema.roots().count(), 2);

    // Structural queries.
    let order = NodeId::new("/Order");
    assert_eq!(query::children_of(graph, &order).len(), 3);
    assert_eq!(query::variation_groups_of(graph, &order).len(), 1);

    // Relational projection.
    let line = columns_of(graph, &NodeId::new("/Order/Line")).unwrap();
    let names: Vec<String> = line.iter().map(|c| c.physical_name()).collect();
    assert_eq!(names, vec!["Order_OrderId", "Seq", "Qty"]);

    let order_columns = columns_of(graph, &order).unwrap();
    let names: Vec<String> = order_columns.iter().map(|c| c.physical_name()).collect();
    assert_eq!(
        names,
        vec!["OrderId", "OrderedAt", "Buyer_CustomerId", "Payment"]
    );

    // Navigations.
    let navigations = navigations_of(graph, &order).unwrap();
    assert_eq!(navigations.len(), 4);
    let cascades = navigations
        .iter()
        .filter(|n| n.on_principal_deleted == DeleteBehavior::Cascade)
        .count();
    assert_eq!(cascades, 3);

    // Key and command trees.
    let key = key_tree_of(graph, &NodeId::new("/Order/Line")).unwrap();
    assert_eq!(key.nodes.len(), 2);

    let create = command_tree_of(graph, &order, MutationKind::Create).unwrap();
    // OrderedAt, Buyer, Line, Cash, Card. OrderId is auto-assigned.
    assert_eq!(create.nodes.len(), 5);
}

#[test]
fn derivations_share_one_immutable_graph_across_threads() {
    let schema = sales();
    let graph = schema.graph().clone();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let order = NodeId::new("/Order");
                let columns = columns_of(&graph, &order).unwrap();
                assert_eq!(columns.len(), 4);
                let navigations = navigations_of(&graph, &order).unwrap();
                assert_eq!(navigations.len(), 4);
            });
        }
    });
}
