//! Typed, attributed edges.
//!
//! Edges are plain data. Interpreting an edge's kind and attributes into a
//! member classification (single child, collection, variant, reference) is
//! the job of the structural query layer, not of the edge itself.

use std::fmt;

use crate::node::NodeId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The relation a directed edge expresses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EdgeKind {
    /// Parent aggregate to child aggregate.
    ParentChild,
    /// Referrer aggregate to referenced aggregate's root.
    Reference,
    /// Aggregate to one of its own value members.
    HasMember,
}

/// How many target instances one source instance relates to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Multiplicity {
    /// At most one.
    #[default]
    Single,
    /// An ordered collection.
    Many,
}

/// Marks a parent-child edge as a member of a tagged-union group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariationTag {
    /// The group this variant belongs to, unique per owner.
    pub group: String,
    /// The discriminator value selecting this variant.
    pub switch: String,
}

/// Attributes carried by every edge. Immutable once the graph is built.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeAttrs {
    /// Single or many, for parent-child edges.
    pub multiplicity: Multiplicity,
    /// Present when the edge is a variant of a variation group.
    pub variation: Option<VariationTag>,
    /// The relation participates in the source's primary key.
    pub is_key: bool,
    /// The relation contributes to the source's display label.
    pub is_display_name: bool,
    /// The relation must be present at persistence time.
    pub is_required: bool,
    /// Declaration order, used for deterministic iteration.
    pub order: usize,
}

/// One directed edge of the schema graph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeInfo {
    /// Where the edge starts.
    pub source: NodeId,
    /// Where the edge ends.
    pub target: NodeId,
    /// The relation's declared name (child name, reference member name).
    pub relation_name: String,
    /// What kind of relation this is.
    pub kind: EdgeKind,
    /// The edge's attribute set.
    pub attrs: EdgeAttrs,
}

impl fmt::Display for EdgeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} =={}=> {}",
            self.source, self.relation_name, self.target
        )
    }
}
