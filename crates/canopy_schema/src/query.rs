//! Structural queries over a validated schema graph.
//!
//! These are thin, read-only views: parentage, descent, member enumeration,
//! child classification, and variation groups. Each function takes the graph
//! and an aggregate id and walks edges; none of them mutate or cache.

use canopy_graph::{
    AggregateNode, EdgeInfo, EdgeKind, MemberNode, Multiplicity, NodeId, SchemaGraph,
};

/// How a child aggregate hangs off its parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChildSlot<'g> {
    /// A singular nested aggregate.
    Single(&'g AggregateNode),
    /// A repeated nested aggregate.
    Collection(&'g AggregateNode),
    /// One variant of a variation group, tagged with its discriminator.
    Variant {
        /// The variant aggregate.
        child: &'g AggregateNode,
        /// The group this variant belongs to.
        group: &'g str,
        /// The discriminator value selecting this variant.
        switch: &'g str,
    },
}

impl<'g> ChildSlot<'g> {
    /// The child aggregate regardless of slot shape.
    #[must_use]
    pub fn child(&self) -> &'g AggregateNode {
        match self {
            Self::Single(child) | Self::Collection(child) | Self::Variant { child, .. } => child,
        }
    }
}

/// A variation group as seen from its owner: the group name, the flags of
/// its first variant edge, and every variant with its discriminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariationGroup<'g> {
    /// The aggregate owning the group.
    pub owner: &'g AggregateNode,
    /// The group name shared by all variants.
    pub group: String,
    /// Whether the discriminator participates in the owner's key.
    pub is_key: bool,
    /// Whether a variant must always be selected.
    pub is_required: bool,
    /// Variants in declaration order with their discriminator values.
    pub variants: Vec<(String, &'g AggregateNode)>,
}

/// The edge connecting an aggregate to its parent, if any.
#[must_use]
pub fn parent_edge_of<'g>(graph: &'g SchemaGraph, id: &NodeId) -> Option<&'g EdgeInfo> {
    graph
        .edges_into(id)
        .find(|edge| edge.kind == EdgeKind::ParentChild)
}

/// The parent aggregate, if the aggregate is not a root.
#[must_use]
pub fn parent_of<'g>(graph: &'g SchemaGraph, id: &NodeId) -> Option<&'g AggregateNode> {
    parent_edge_of(graph, id).and_then(|edge| graph.aggregate(&edge.source))
}

/// Ancestors from the root down to (excluding) the aggregate itself.
#[must_use]
pub fn ancestors_of<'g>(graph: &'g SchemaGraph, id: &NodeId) -> Vec<&'g AggregateNode> {
    let mut chain = Vec::new();
    let mut current = id.clone();
    loop {
        let parent_id = graph
            .edges_into(&current)
            .find(|edge| edge.kind == EdgeKind::ParentChild)
            .map(|edge| edge.source.clone());
        let Some(parent_id) = parent_id else {
            break;
        };
        if let Some(parent) = graph.aggregate(&parent_id) {
            chain.push(parent);
        }
        current = parent_id;
    }
    chain.reverse();
    chain
}

/// The root of the tree containing the aggregate.
#[must_use]
pub fn root_of<'g>(graph: &'g SchemaGraph, id: &NodeId) -> Option<&'g AggregateNode> {
    match ancestors_of(graph, id).first() {
        Some(root) => Some(root),
        None => graph.aggregate(id),
    }
}

/// The aggregate and all nested aggregates beneath it, pre-order.
#[must_use]
pub fn descendants_of<'g>(graph: &'g SchemaGraph, id: &NodeId) -> Vec<&'g AggregateNode> {
    let mut result = Vec::new();
    let mut stack = vec![id.clone()];
    while let Some(current) = stack.pop() {
        if let Some(aggregate) = graph.aggregate(&current) {
            result.push(aggregate);
        }
        // Children are pushed reversed so the stack pops them in order.
        let children: Vec<NodeId> = graph
            .edges_from(&current)
            .filter(|edge| edge.kind == EdgeKind::ParentChild)
            .map(|edge| edge.target.clone())
            .collect();
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }
    result
}

/// Value members of an aggregate, in declaration order.
#[must_use]
pub fn members_of<'g>(graph: &'g SchemaGraph, id: &NodeId) -> Vec<&'g MemberNode> {
    graph
        .edges_from(id)
        .filter(|edge| edge.kind == EdgeKind::HasMember)
        .filter_map(|edge| graph.member(&edge.target))
        .collect()
}

/// Child aggregates of an aggregate, classified by slot shape.
#[must_use]
pub fn children_of<'g>(graph: &'g SchemaGraph, id: &NodeId) -> Vec<ChildSlot<'g>> {
    graph
        .edges_from(id)
        .filter(|edge| edge.kind == EdgeKind::ParentChild)
        .filter_map(|edge| {
            let child = graph.aggregate(&edge.target)?;
            Some(if edge.attrs.multiplicity == Multiplicity::Many {
                ChildSlot::Collection(child)
            } else if let Some(tag) = &edge.attrs.variation {
                ChildSlot::Variant {
                    child,
                    group: &tag.group,
                    switch: &tag.switch,
                }
            } else {
                ChildSlot::Single(child)
            })
        })
        .collect()
}

/// Outgoing reference edges of an aggregate, in declaration order.
#[must_use]
pub fn references_of<'g>(graph: &'g SchemaGraph, id: &NodeId) -> Vec<&'g EdgeInfo> {
    graph
        .edges_from(id)
        .filter(|edge| edge.kind == EdgeKind::Reference)
        .collect()
}

/// Incoming reference edges pointing at an aggregate.
#[must_use]
pub fn referenced_by<'g>(graph: &'g SchemaGraph, id: &NodeId) -> Vec<&'g EdgeInfo> {
    graph
        .edges_into(id)
        .filter(|edge| edge.kind == EdgeKind::Reference)
        .collect()
}

/// Variation groups owned by an aggregate, in first-variant order.
#[must_use]
pub fn variation_groups_of<'g>(graph: &'g SchemaGraph, id: &NodeId) -> Vec<VariationGroup<'g>> {
    let owner = match graph.aggregate(id) {
        Some(owner) => owner,
        None => return Vec::new(),
    };
    let mut groups: Vec<VariationGroup<'g>> = Vec::new();
    for edge in graph.edges_from(id) {
        if edge.kind != EdgeKind::ParentChild {
            continue;
        }
        let Some(tag) = &edge.attrs.variation else {
            continue;
        };
        let Some(child) = graph.aggregate(&edge.target) else {
            continue;
        };
        match groups.iter_mut().find(|group| group.group == tag.group) {
            Some(group) => group.variants.push((tag.switch.clone(), child)),
            None => groups.push(VariationGroup {
                owner,
                group: tag.group.clone(),
                is_key: edge.attrs.is_key,
                is_required: edge.attrs.is_required,
                variants: vec![(tag.switch.clone(), child)],
            }),
        }
    }
    groups
}
