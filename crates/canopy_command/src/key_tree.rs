//! Key trees: the identity of an aggregate as a recursive structure.
//!
//! A key tree has one leaf per own is-key value member, the parent's key
//! tree embedded as a single sub-node, and one embedded key tree per
//! is-key reference. Shapes mirror the inheritance rules of the column
//! projection, so the two stay translatable by path rewriting.

use std::collections::HashSet;

use canopy_foundation::{Defect, ValueType};
use canopy_graph::{NodeId, SchemaGraph};
use canopy_schema::query;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One entry in a key tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyNode {
    /// An own is-key value member.
    Leaf {
        /// The declaring member node.
        member: NodeId,
        /// The member's physical name.
        name: String,
        /// The member's value type.
        value_type: ValueType,
    },
    /// The parent aggregate's key tree, embedded as one sub-node.
    Parent {
        /// The parent aggregate's key tree.
        tree: KeyTree,
    },
    /// An is-key reference, carrying the target's key tree.
    Reference {
        /// The reference member's physical name.
        via: String,
        /// The referenced aggregate's key tree.
        tree: KeyTree,
    },
}

/// The identity of one aggregate: its key members, recursively.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyTree {
    /// The aggregate this tree identifies.
    pub aggregate: NodeId,
    /// Entries in fixed order: parent, own leaves, references.
    pub nodes: Vec<KeyNode>,
}

/// Builds the key tree of an aggregate.
///
/// # Errors
///
/// Returns [`Defect::UnknownNode`] for an id with no aggregate and
/// [`Defect::CycleDetected`] when key recursion revisits an aggregate
/// along a single path.
pub fn key_tree_of(graph: &SchemaGraph, id: &NodeId) -> Result<KeyTree, Defect> {
    let mut chain = HashSet::new();
    key_tree_inner(graph, id, &mut chain)
}

fn key_tree_inner(
    graph: &SchemaGraph,
    id: &NodeId,
    chain: &mut HashSet<NodeId>,
) -> Result<KeyTree, Defect> {
    if !chain.insert(id.clone()) {
        return Err(Defect::CycleDetected(id.as_str().to_owned()));
    }
    if graph.aggregate(id).is_none() {
        return Err(Defect::UnknownNode(id.as_str().to_owned()));
    }
    let mut nodes = Vec::new();

    if let Some(edge) = query::parent_edge_of(graph, id) {
        nodes.push(KeyNode::Parent {
            tree: key_tree_inner(graph, &edge.source, chain)?,
        });
    }

    for member in query::members_of(graph, id) {
        if !member.is_key {
            continue;
        }
        nodes.push(KeyNode::Leaf {
            member: member.id.clone(),
            name: member.name.clone(),
            value_type: member.value_type.clone(),
        });
    }

    for edge in query::references_of(graph, id) {
        if !edge.attrs.is_key {
            continue;
        }
        nodes.push(KeyNode::Reference {
            via: edge.relation_name.clone(),
            tree: key_tree_inner(graph, &edge.target, chain)?,
        });
    }

    chain.remove(id);
    Ok(KeyTree {
        aggregate: id.clone(),
        nodes,
    })
}
