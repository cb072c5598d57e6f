//! Column projection: an aggregate flattened to an ordered column list.
//!
//! Every aggregate projects to a fixed-order list: inherited parent keys,
//! its own value members, foreign keys for each outgoing reference, then
//! one discriminator per variation group. Key inheritance recurses through
//! ancestors and reference targets with an explicit per-path cycle guard,
//! so a malformed graph reports a defect instead of looping.

use std::collections::HashSet;

use canopy_foundation::{Defect, PrimitiveKind, ValueType};
use canopy_graph::{AggregateNode, EdgeInfo, NodeId, SchemaGraph};
use canopy_schema::query;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The separator joining prefix segments into a physical column name.
const NAME_SEPARATOR: &str = "_";

/// Where a column ultimately comes from.
///
/// Origins identify the declaring value member (or variation group), not
/// the path the column was reached by. Two columns reached by different
/// paths share an origin but remain distinct columns.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColumnOrigin {
    /// A declared value member.
    Member(NodeId),
    /// The discriminator of a variation group.
    Discriminator {
        /// The aggregate owning the group.
        owner: NodeId,
        /// The group name.
        group: String,
    },
}

/// The role a column plays in its aggregate's table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColumnRole {
    /// A value member declared directly on the aggregate.
    Own,
    /// An ancestor's primary-key column, re-emitted on the descendant.
    ParentKey,
    /// A reference target's primary-key column, re-emitted on the referrer.
    RefKey {
        /// The reference member on this aggregate the column came through.
        via: String,
    },
    /// The discriminator of a variation group on this aggregate.
    Discriminator,
}

/// One column of an aggregate's relational projection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelationalColumn {
    /// The role of the column.
    pub role: ColumnRole,
    /// Naming segments prepended to the base name, outermost first.
    pub prefix: Vec<String>,
    /// The originating member's physical name.
    pub base: String,
    /// The persisted value type.
    pub value_type: ValueType,
    /// The declaring member or group, independent of the path taken.
    pub origin: ColumnOrigin,
    /// Whether the column participates in the aggregate's primary key.
    pub is_key: bool,
}

impl RelationalColumn {
    /// The physical column name: prefix segments plus base, underscored.
    #[must_use]
    pub fn physical_name(&self) -> String {
        if self.prefix.is_empty() {
            return self.base.clone();
        }
        let mut name = self.prefix.join(NAME_SEPARATOR);
        name.push_str(NAME_SEPARATOR);
        name.push_str(&self.base);
        name
    }
}

/// Projects an aggregate into its ordered column list.
///
/// Order is always parent keys, own members, reference keys, then
/// discriminators. Members keep declaration order within each section.
///
/// # Errors
///
/// Returns [`Defect::UnknownNode`] when the id is not an aggregate and
/// [`Defect::CycleDetected`] when key inheritance revisits an aggregate
/// along a single recursion path.
pub fn columns_of(graph: &SchemaGraph, id: &NodeId) -> Result<Vec<RelationalColumn>, Defect> {
    resolve_aggregate(graph, id)?;
    let mut columns = Vec::new();

    if let Some(edge) = query::parent_edge_of(graph, id) {
        let parent = resolve_aggregate(graph, &edge.source)?;
        let mut chain = HashSet::new();
        chain.insert(id.clone());
        for key in primary_key_columns(graph, &edge.source, &mut chain)? {
            columns.push(inherit_from_parent(key, parent));
        }
    }

    for member in query::members_of(graph, id) {
        columns.push(RelationalColumn {
            role: ColumnRole::Own,
            prefix: Vec::new(),
            base: member.name.clone(),
            value_type: member.value_type.clone(),
            origin: ColumnOrigin::Member(member.id.clone()),
            is_key: member.is_key,
        });
    }

    for edge in query::references_of(graph, id) {
        let mut chain = HashSet::new();
        for key in primary_key_columns(graph, &edge.target, &mut chain)? {
            columns.push(inherit_from_reference(key, edge, edge.attrs.is_key));
        }
    }

    for group in query::variation_groups_of(graph, id) {
        columns.push(discriminator_column(id, &group.group, group.is_key));
    }

    Ok(columns)
}

/// Computes just the primary-key columns of an aggregate.
///
/// The key set is all inherited parent keys, own is-key members, the key
/// columns of is-key references, and is-key discriminators.
///
/// # Errors
///
/// Same defects as [`columns_of`].
pub fn primary_key_of(graph: &SchemaGraph, id: &NodeId) -> Result<Vec<RelationalColumn>, Defect> {
    let mut chain = HashSet::new();
    primary_key_columns(graph, id, &mut chain)
}

fn resolve_aggregate<'g>(
    graph: &'g SchemaGraph,
    id: &NodeId,
) -> Result<&'g AggregateNode, Defect> {
    graph
        .aggregate(id)
        .ok_or_else(|| Defect::UnknownNode(id.as_str().to_owned()))
}

/// Recursive key collection with a per-path revisit guard.
///
/// The chain holds the aggregates on the current recursion path only, so
/// the same aggregate contributing keys through two independent references
/// (a diamond) stays legal while a genuine loop is reported.
fn primary_key_columns(
    graph: &SchemaGraph,
    id: &NodeId,
    chain: &mut HashSet<NodeId>,
) -> Result<Vec<RelationalColumn>, Defect> {
    if !chain.insert(id.clone()) {
        return Err(Defect::CycleDetected(id.as_str().to_owned()));
    }
    resolve_aggregate(graph, id)?;
    let mut keys = Vec::new();

    if let Some(edge) = query::parent_edge_of(graph, id) {
        let parent = resolve_aggregate(graph, &edge.source)?;
        for key in primary_key_columns(graph, &edge.source, chain)? {
            keys.push(inherit_from_parent(key, parent));
        }
    }

    for member in query::members_of(graph, id) {
        if !member.is_key {
            continue;
        }
        keys.push(RelationalColumn {
            role: ColumnRole::Own,
            prefix: Vec::new(),
            base: member.name.clone(),
            value_type: member.value_type.clone(),
            origin: ColumnOrigin::Member(member.id.clone()),
            is_key: true,
        });
    }

    for edge in query::references_of(graph, id) {
        if !edge.attrs.is_key {
            continue;
        }
        for key in primary_key_columns(graph, &edge.target, chain)? {
            keys.push(inherit_from_reference(key, edge, true));
        }
    }

    for group in query::variation_groups_of(graph, id) {
        if group.is_key {
            keys.push(discriminator_column(id, &group.group, true));
        }
    }

    chain.remove(id);
    Ok(keys)
}

/// Re-emits a parent key on a child: the parent's physical name joins the
/// end of the prefix, so a key inherited through several levels reads
/// root-to-leaf.
fn inherit_from_parent(key: RelationalColumn, parent: &AggregateNode) -> RelationalColumn {
    let mut prefix = key.prefix;
    prefix.push(parent.physical_name.clone());
    RelationalColumn {
        role: ColumnRole::ParentKey,
        prefix,
        base: key.base,
        value_type: key.value_type,
        origin: key.origin,
        is_key: true,
    }
}

/// Re-emits a reference target's key on the referrer: the reference member
/// name is prepended, so multi-hop reference keys compose left to right.
fn inherit_from_reference(
    key: RelationalColumn,
    edge: &EdgeInfo,
    is_key: bool,
) -> RelationalColumn {
    let mut prefix = Vec::with_capacity(key.prefix.len() + 1);
    prefix.push(edge.relation_name.clone());
    prefix.extend(key.prefix);
    RelationalColumn {
        role: ColumnRole::RefKey {
            via: edge.relation_name.clone(),
        },
        prefix,
        base: key.base,
        value_type: key.value_type,
        origin: key.origin,
        is_key,
    }
}

fn discriminator_column(owner: &NodeId, group: &str, is_key: bool) -> RelationalColumn {
    RelationalColumn {
        role: ColumnRole::Discriminator,
        prefix: Vec::new(),
        base: group.to_owned(),
        value_type: ValueType::new("word", PrimitiveKind::Text),
        origin: ColumnOrigin::Discriminator {
            owner: owner.clone(),
            group: group.to_owned(),
        },
        is_key,
    }
}
