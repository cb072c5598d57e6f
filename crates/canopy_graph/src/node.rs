//! Graph node identities and payloads.

use std::fmt;
use std::sync::Arc;

use canopy_foundation::{TreePath, ValueType};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable node identity derived from the declaration path.
///
/// Two declarations with the same path produce the same identity, which is
/// what makes duplicate detection and edge resolution possible before any
/// node object exists.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Creates an identity from a raw string.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(Arc::from(value.as_ref()))
    }

    /// The textual form of this identity.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&TreePath> for NodeId {
    fn from(path: &TreePath) -> Self {
        Self::new(path.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// One structural unit of the domain model: a root or nested aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AggregateNode {
    /// Path-derived identity.
    pub id: NodeId,
    /// Name shown to humans.
    pub display_name: String,
    /// Name used in generated artifacts (tables, classes).
    pub physical_name: String,
}

/// A scalar attribute declared directly on an aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemberNode {
    /// Path-derived identity.
    pub id: NodeId,
    /// The member's declared name.
    pub name: String,
    /// Resolved value type.
    pub value_type: ValueType,
    /// Part of the owning aggregate's primary key.
    pub is_key: bool,
    /// Used as the aggregate's human-readable label.
    pub is_display_name: bool,
    /// Must be present at persistence time.
    pub is_required: bool,
}

/// Any node in the schema graph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GraphNode {
    /// A root or nested aggregate.
    Aggregate(AggregateNode),
    /// A scalar value member.
    Member(MemberNode),
}

impl GraphNode {
    /// This node's identity.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Aggregate(node) => &node.id,
            Self::Member(node) => &node.id,
        }
    }

    /// Returns the aggregate payload, if this node is an aggregate.
    #[must_use]
    pub fn as_aggregate(&self) -> Option<&AggregateNode> {
        match self {
            Self::Aggregate(node) => Some(node),
            Self::Member(_) => None,
        }
    }

    /// Returns the member payload, if this node is a value member.
    #[must_use]
    pub fn as_member(&self) -> Option<&MemberNode> {
        match self {
            Self::Member(node) => Some(node),
            Self::Aggregate(_) => None,
        }
    }
}
