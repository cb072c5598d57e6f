//! Command trees: the mutable surface of an aggregate per operation.

use std::collections::HashSet;

use canopy_foundation::{Defect, ValueType};
use canopy_graph::{NodeId, SchemaGraph};
use canopy_schema::{query, ChildSlot};

use crate::key_tree::{key_tree_of, KeyTree};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The operation a command tree is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MutationKind {
    /// Insert a new record. Auto-assigned members are omitted.
    Create,
    /// Overwrite an existing record. Carries a version token.
    Update,
    /// Remove an existing record. Keys and the version token only.
    Delete,
}

/// One field of a command tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CommandNode {
    /// An own value member.
    Value {
        /// The declaring member node.
        member: NodeId,
        /// The member's physical name.
        name: String,
        /// The member's value type.
        value_type: ValueType,
    },
    /// A reference, carried as the target's key tree.
    Reference {
        /// The reference member's physical name.
        via: String,
        /// The referenced aggregate's key tree.
        keys: KeyTree,
    },
    /// A singular nested command tree.
    Child {
        /// The child's relation name.
        name: String,
        /// The nested tree, built for the same operation.
        tree: CommandTree,
    },
    /// A repeated nested command tree.
    Collection {
        /// The child's relation name.
        name: String,
        /// The nested tree, built for the same operation.
        tree: CommandTree,
    },
    /// A variant nested command tree, selected by its discriminator.
    Variant {
        /// The variant's relation name.
        name: String,
        /// The discriminator value selecting this variant.
        switch: String,
        /// The nested tree, built for the same operation.
        tree: CommandTree,
    },
    /// The optimistic-concurrency token, present at the root of updates
    /// and deletes.
    Version,
}

/// The fields of one mutation against one aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CommandTree {
    /// The aggregate this tree mutates.
    pub aggregate: NodeId,
    /// The operation the tree was built for.
    pub operation: MutationKind,
    /// Fields in declaration order, version token last.
    pub nodes: Vec<CommandNode>,
}

/// Builds the command tree of an aggregate for one operation.
///
/// # Errors
///
/// Returns [`Defect::UnknownNode`] for an id with no aggregate and
/// [`Defect::CycleDetected`] when recursion revisits an aggregate along
/// a single path.
pub fn command_tree_of(
    graph: &SchemaGraph,
    id: &NodeId,
    operation: MutationKind,
) -> Result<CommandTree, Defect> {
    let mut chain = HashSet::new();
    let mut tree = command_tree_inner(graph, id, operation, &mut chain)?;
    if matches!(operation, MutationKind::Update | MutationKind::Delete) {
        tree.nodes.push(CommandNode::Version);
    }
    Ok(tree)
}

fn command_tree_inner(
    graph: &SchemaGraph,
    id: &NodeId,
    operation: MutationKind,
    chain: &mut HashSet<NodeId>,
) -> Result<CommandTree, Defect> {
    if !chain.insert(id.clone()) {
        return Err(Defect::CycleDetected(id.as_str().to_owned()));
    }
    if graph.aggregate(id).is_none() {
        return Err(Defect::UnknownNode(id.as_str().to_owned()));
    }
    let mut nodes = Vec::new();

    for member in query::members_of(graph, id) {
        let included = match operation {
            MutationKind::Create => !member.value_type.is_sequence(),
            MutationKind::Update => true,
            MutationKind::Delete => member.is_key,
        };
        if !included {
            continue;
        }
        nodes.push(CommandNode::Value {
            member: member.id.clone(),
            name: member.name.clone(),
            value_type: member.value_type.clone(),
        });
    }

    for edge in query::references_of(graph, id) {
        if operation == MutationKind::Delete && !edge.attrs.is_key {
            continue;
        }
        nodes.push(CommandNode::Reference {
            via: edge.relation_name.clone(),
            keys: key_tree_of(graph, &edge.target)?,
        });
    }

    if operation != MutationKind::Delete {
        for slot in query::children_of(graph, id) {
            let child = slot.child();
            let tree = command_tree_inner(graph, &child.id, operation, chain)?;
            nodes.push(match slot {
                ChildSlot::Single(_) => CommandNode::Child {
                    name: child.physical_name.clone(),
                    tree,
                },
                ChildSlot::Collection(_) => CommandNode::Collection {
                    name: child.physical_name.clone(),
                    tree,
                },
                ChildSlot::Variant { switch, .. } => CommandNode::Variant {
                    name: child.physical_name.clone(),
                    switch: switch.to_owned(),
                    tree,
                },
            });
        }
    }

    chain.remove(id);
    Ok(CommandTree {
        aggregate: id.clone(),
        operation,
        nodes,
    })
}
