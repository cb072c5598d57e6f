//! Path rewriting between command trees and relational columns.
//!
//! Command-tree field paths and column physical names describe the same
//! storage locations with different shapes. [`rewrite_to_columns`] turns a
//! field path into column name segments: the entry aggregate's own name is
//! dropped, and a reference hop followed by its target aggregate collapses
//! into the single reference-member segment. Joining the segments with an
//! underscore yields the physical column name of the projection.

use canopy_foundation::Defect;
use canopy_graph::{EdgeKind, NodeId, SchemaGraph};
use canopy_schema::query;

use crate::key_tree::{KeyNode, KeyTree};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One hop of a command-tree field path.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathStep {
    /// Entering an aggregate by its physical name.
    Aggregate(String),
    /// Crossing a reference member by its physical name.
    Ref(String),
    /// Reading a value member by its physical name.
    Value(String),
}

fn node_base_name(id: &NodeId) -> &str {
    id.as_str().rsplit('/').next().unwrap_or_default()
}

/// Rewrites a field path rooted at `entry` into column name segments.
///
/// # Errors
///
/// Returns [`Defect::BackwardReferencePath`] when a step walks from a
/// reference target back to its referrer, and [`Defect::UnknownNode`]
/// when a step names nothing adjacent to the current aggregate.
pub fn rewrite_to_columns(
    graph: &SchemaGraph,
    entry: &NodeId,
    path: &[PathStep],
) -> Result<Vec<String>, Defect> {
    if graph.aggregate(entry).is_none() {
        return Err(Defect::UnknownNode(entry.as_str().to_owned()));
    }
    let mut steps = path.iter();
    match steps.next() {
        Some(PathStep::Aggregate(name)) if name == node_base_name(entry) => {}
        _ => {
            return Err(Defect::UnknownNode(entry.as_str().to_owned()));
        }
    }

    let mut current = entry.clone();
    let mut segments: Vec<String> = Vec::new();
    // Start of the current parent-ascent run. Ascending grandchild to root
    // visits leaf-to-root, but column prefixes read root-to-leaf, so each
    // parent segment is inserted at the front of its run.
    let mut ascent_start = 0;
    while let Some(step) = steps.next() {
        match step {
            PathStep::Value(name) => {
                let known = query::members_of(graph, &current)
                    .iter()
                    .any(|member| member.name == *name);
                if !known {
                    return Err(Defect::UnknownNode(format!(
                        "{}/{name}",
                        current.as_str()
                    )));
                }
                segments.push(name.clone());
                ascent_start = segments.len();
            }
            PathStep::Ref(name) => {
                let Some(edge) = query::references_of(graph, &current)
                    .into_iter()
                    .find(|edge| edge.relation_name == *name)
                else {
                    return Err(Defect::UnknownNode(format!(
                        "{}/{name}",
                        current.as_str()
                    )));
                };
                // The hop and its target collapse into one segment.
                let target = edge.target.clone();
                match steps.next() {
                    Some(PathStep::Aggregate(next)) if next == node_base_name(&target) => {}
                    _ => {
                        return Err(Defect::UnknownNode(format!(
                            "{}/{name}",
                            current.as_str()
                        )));
                    }
                }
                segments.push(name.clone());
                ascent_start = segments.len();
                current = target;
            }
            PathStep::Aggregate(name) => {
                current =
                    step_into_aggregate(graph, &current, name, &mut segments, &mut ascent_start)?;
            }
        }
    }
    Ok(segments)
}

/// Resolves a bare aggregate step: a child hop or an ascent to the parent.
/// An aggregate reachable only backwards across a reference is a defect.
fn step_into_aggregate(
    graph: &SchemaGraph,
    current: &NodeId,
    name: &str,
    segments: &mut Vec<String>,
    ascent_start: &mut usize,
) -> Result<NodeId, Defect> {
    if let Some(edge) = graph
        .edges_from(current)
        .find(|edge| edge.kind == EdgeKind::ParentChild && edge.relation_name == name)
    {
        segments.push(name.to_owned());
        *ascent_start = segments.len();
        return Ok(edge.target.clone());
    }
    if let Some(edge) = query::parent_edge_of(graph, current) {
        if node_base_name(&edge.source) == name {
            segments.insert(*ascent_start, name.to_owned());
            return Ok(edge.source.clone());
        }
    }
    if query::referenced_by(graph, current)
        .iter()
        .any(|edge| node_base_name(&edge.source) == name)
    {
        return Err(Defect::BackwardReferencePath(current.as_str().to_owned()));
    }
    Err(Defect::UnknownNode(format!("{}/{name}", current.as_str())))
}

/// Enumerates the field path of every leaf of a key tree, entry first.
#[must_use]
pub fn key_leaf_paths(tree: &KeyTree) -> Vec<Vec<PathStep>> {
    let mut paths = Vec::new();
    let prefix = vec![PathStep::Aggregate(
        node_base_name(&tree.aggregate).to_owned(),
    )];
    collect_leaf_paths(tree, &prefix, &mut paths);
    paths
}

fn collect_leaf_paths(tree: &KeyTree, prefix: &[PathStep], paths: &mut Vec<Vec<PathStep>>) {
    for node in &tree.nodes {
        match node {
            KeyNode::Leaf { name, .. } => {
                let mut path = prefix.to_vec();
                path.push(PathStep::Value(name.clone()));
                paths.push(path);
            }
            KeyNode::Parent { tree: parent } => {
                let mut inner = prefix.to_vec();
                inner.push(PathStep::Aggregate(
                    node_base_name(&parent.aggregate).to_owned(),
                ));
                collect_leaf_paths(parent, &inner, paths);
            }
            KeyNode::Reference { via, tree: target } => {
                let mut inner = prefix.to_vec();
                inner.push(PathStep::Ref(via.clone()));
                inner.push(PathStep::Aggregate(
                    node_base_name(&target.aggregate).to_owned(),
                ));
                collect_leaf_paths(target, &inner, paths);
            }
        }
    }
}
