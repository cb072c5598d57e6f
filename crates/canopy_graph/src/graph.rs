//! The immutable schema graph.

use canopy_foundation::{SchemaError, SchemaErrorKind, SchemaReport};

use crate::edge::EdgeInfo;
use crate::node::{AggregateNode, GraphNode, MemberNode, NodeId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The validated set of all nodes and edges.
///
/// Construction checks that node identities are unique and every edge
/// endpoint resolves; all violations are accumulated, never thrown one at
/// a time. After construction the graph never changes, so derivations may
/// run concurrently over shared clones.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchemaGraph {
    nodes: im::OrdMap<NodeId, GraphNode>,
    edges: im::Vector<EdgeInfo>,
}

impl SchemaGraph {
    /// Builds a graph from nodes and edges, validating structural integrity.
    ///
    /// # Errors
    ///
    /// Returns every duplicate node identity and every edge endpoint that
    /// does not resolve to a given node, in one report.
    pub fn try_new(
        nodes: impl IntoIterator<Item = GraphNode>,
        edges: impl IntoIterator<Item = EdgeInfo>,
    ) -> Result<Self, SchemaReport> {
        let mut report = SchemaReport::new();

        let mut node_map = im::OrdMap::new();
        for node in nodes {
            let id = node.id().clone();
            if node_map.insert(id.clone(), node).is_some() {
                report.push(SchemaError::new(SchemaErrorKind::DuplicateNode(
                    id.as_str().to_owned(),
                )));
            }
        }

        let mut edge_list: Vec<EdgeInfo> = Vec::new();
        for edge in edges {
            let mut resolved = true;
            for endpoint in [&edge.source, &edge.target] {
                if !node_map.contains_key(endpoint) {
                    report.push(SchemaError::new(SchemaErrorKind::UnresolvedEndpoint(
                        endpoint.as_str().to_owned(),
                    )));
                    resolved = false;
                }
            }
            if resolved {
                edge_list.push(edge);
            }
        }

        if !report.is_empty() {
            return Err(report);
        }

        // Deterministic edge order: declaration order, then name for stability.
        edge_list.sort_by(|a, b| {
            (a.attrs.order, &a.relation_name).cmp(&(b.attrs.order, &b.relation_name))
        });

        Ok(Self {
            nodes: node_map,
            edges: edge_list.into_iter().collect(),
        })
    }

    /// Looks up a node by identity.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Looks up an aggregate node by identity.
    #[must_use]
    pub fn aggregate(&self, id: &NodeId) -> Option<&AggregateNode> {
        self.nodes.get(id).and_then(GraphNode::as_aggregate)
    }

    /// Looks up a value-member node by identity.
    #[must_use]
    pub fn member(&self, id: &NodeId) -> Option<&MemberNode> {
        self.nodes.get(id).and_then(GraphNode::as_member)
    }

    /// Iterates all nodes in identity order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Iterates all aggregate nodes in identity order.
    pub fn aggregates(&self) -> impl Iterator<Item = &AggregateNode> {
        self.nodes.values().filter_map(GraphNode::as_aggregate)
    }

    /// Iterates all edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeInfo> {
        self.edges.iter()
    }

    /// Iterates edges leaving `id`, in declaration order.
    ///
    /// The returned iterator borrows only the graph, so the id may be a
    /// temporary.
    pub fn edges_from<'g>(&'g self, id: &NodeId) -> impl Iterator<Item = &'g EdgeInfo> + use<'g> {
        let id = id.clone();
        self.edges.iter().filter(move |edge| edge.source == id)
    }

    /// Iterates edges arriving at `id`, in declaration order.
    ///
    /// The returned iterator borrows only the graph, so the id may be a
    /// temporary.
    pub fn edges_into<'g>(&'g self, id: &NodeId) -> impl Iterator<Item = &'g EdgeInfo> + use<'g> {
        let id = id.clone();
        self.edges.iter().filter(move |edge| edge.target == id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
