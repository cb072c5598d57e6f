//! Navigation derivation: relationship metadata for each adjacent edge.
//!
//! Each parent-child or reference edge yields one [`NavigationEdge`] naming
//! the principal and dependent sides, the dependent-side cardinality, the
//! delete behavior, a collision-resistant constraint name, and the foreign
//! key columns backing the relationship. Parent-child relationships cascade;
//! references never do.

use canopy_foundation::Defect;
use canopy_graph::{AggregateNode, EdgeInfo, EdgeKind, Multiplicity, NodeId, SchemaGraph};
use canopy_schema::query;

use crate::projection::{columns_of, primary_key_of, ColumnRole, RelationalColumn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What happens to the dependent when the principal is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeleteBehavior {
    /// Dependent rows are deleted with the principal.
    Cascade,
    /// Deletion of the principal is blocked while dependents exist.
    NoAction,
}

/// One side of a navigation relationship.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavigationSide {
    /// The aggregate on this side.
    pub aggregate: NodeId,
    /// The property name on this side pointing at the other side.
    pub role: String,
}

/// A derived relationship between two aggregates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavigationEdge {
    /// The side whose deletion drives the delete behavior.
    pub principal: NavigationSide,
    /// The side holding the foreign key.
    pub dependent: NavigationSide,
    /// Whether the principal can face many dependents.
    pub many: bool,
    /// The delete behavior applied to dependents.
    pub on_principal_deleted: DeleteBehavior,
    /// A deterministic, collision-resistant constraint name.
    pub constraint_name: String,
    /// The foreign-key columns, in the dependent table's column order.
    pub foreign_key: Vec<RelationalColumn>,
}

/// Derives one navigation per edge adjacent to the aggregate.
///
/// Enumeration order is fixed: the parent edge, child edges, outgoing
/// references, then incoming references.
///
/// # Errors
///
/// Returns [`Defect::UnknownNode`] for an id with no aggregate, and
/// propagates projection defects from foreign-key computation. An adjacent
/// edge that is neither parent-child nor reference is
/// [`Defect::UnclassifiableEdge`].
pub fn navigations_of(graph: &SchemaGraph, id: &NodeId) -> Result<Vec<NavigationEdge>, Defect> {
    if graph.aggregate(id).is_none() {
        return Err(Defect::UnknownNode(id.as_str().to_owned()));
    }
    let mut navigations = Vec::new();

    if let Some(edge) = query::parent_edge_of(graph, id) {
        navigations.push(parent_child_navigation(graph, edge)?);
    }
    for edge in graph.edges_from(id) {
        // Edges to value members are not relationships.
        if graph.member(&edge.target).is_some() {
            continue;
        }
        match edge.kind {
            EdgeKind::ParentChild => navigations.push(parent_child_navigation(graph, edge)?),
            EdgeKind::Reference => navigations.push(reference_navigation(graph, edge)?),
            EdgeKind::HasMember => {
                return Err(Defect::UnclassifiableEdge(edge.to_string()));
            }
        }
    }
    for edge in query::referenced_by(graph, id) {
        // A self-reference already appeared among the outgoing edges.
        if edge.source == *id {
            continue;
        }
        navigations.push(reference_navigation(graph, edge)?);
    }

    Ok(navigations)
}

fn resolve_aggregate<'g>(
    graph: &'g SchemaGraph,
    id: &NodeId,
) -> Result<&'g AggregateNode, Defect> {
    graph
        .aggregate(id)
        .ok_or_else(|| Defect::UnknownNode(id.as_str().to_owned()))
}

/// Parent-child and variant edges: the parent is principal and deleting it
/// cascades. The foreign key is the child's inherited parent-key columns,
/// matched against the parent's primary key by origin identity.
fn parent_child_navigation(
    graph: &SchemaGraph,
    edge: &EdgeInfo,
) -> Result<NavigationEdge, Defect> {
    let parent = resolve_aggregate(graph, &edge.source)?;
    let child = resolve_aggregate(graph, &edge.target)?;

    let parent_key = primary_key_of(graph, &edge.source)?;
    let foreign_key: Vec<RelationalColumn> = columns_of(graph, &edge.target)?
        .into_iter()
        .filter(|column| {
            column.role == ColumnRole::ParentKey
                && parent_key.iter().any(|key| key.origin == column.origin)
        })
        .collect();

    Ok(NavigationEdge {
        principal: NavigationSide {
            aggregate: edge.source.clone(),
            role: edge.relation_name.clone(),
        },
        dependent: NavigationSide {
            aggregate: edge.target.clone(),
            role: "Parent".to_owned(),
        },
        many: edge.attrs.multiplicity == Multiplicity::Many,
        on_principal_deleted: DeleteBehavior::Cascade,
        constraint_name: format!("FK_{}_{}", parent.physical_name, child.physical_name),
        foreign_key,
    })
}

/// Reference edges never cascade. The referenced aggregate is principal
/// unless the reference is the referrer's sole primary key, which makes
/// the relationship one-to-one with the referrer as principal.
fn reference_navigation(graph: &SchemaGraph, edge: &EdgeInfo) -> Result<NavigationEdge, Defect> {
    let referrer = resolve_aggregate(graph, &edge.source)?;
    let referenced = resolve_aggregate(graph, &edge.target)?;

    let foreign_key: Vec<RelationalColumn> = columns_of(graph, &edge.source)?
        .into_iter()
        .filter(|column| {
            matches!(&column.role, ColumnRole::RefKey { via } if *via == edge.relation_name)
        })
        .collect();

    let referrer_key = primary_key_of(graph, &edge.source)?;
    let sole_key = !referrer_key.is_empty()
        && referrer_key.iter().all(|column| {
            matches!(&column.role, ColumnRole::RefKey { via } if *via == edge.relation_name)
        });

    let referrer_side = NavigationSide {
        aggregate: edge.source.clone(),
        role: edge.relation_name.clone(),
    };
    let referenced_side = NavigationSide {
        aggregate: edge.target.clone(),
        role: format!("{}_{}", referrer.physical_name, edge.relation_name),
    };
    let (principal, dependent, many) = if sole_key {
        (referrer_side, referenced_side, false)
    } else {
        (referenced_side, referrer_side, true)
    };

    Ok(NavigationEdge {
        principal,
        dependent,
        many,
        on_principal_deleted: DeleteBehavior::NoAction,
        constraint_name: format!(
            "FK_{}_{}_{}",
            referenced.physical_name,
            referrer.physical_name,
            short_hash(&edge.relation_name)
        ),
        foreign_key,
    })
}

/// Eight uppercase hex digits derived from a name. Disambiguates constraint
/// names when two aggregates hold more than one reference between them.
///
/// FNV-1a with a fixed 64-bit seed, truncated to 32 bits. Generated names
/// must never change under a toolchain upgrade, which rules out the standard
/// library hashers.
fn short_hash(name: &str) -> String {
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = FNV_OFFSET_BASIS;
    for byte in name.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{:08X}", hash & 0xFFFF_FFFF)
}
