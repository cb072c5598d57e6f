//! Directed-graph primitives for the Canopy schema compiler.
//!
//! This crate provides:
//! - [`NodeId`] - Path-derived stable node identities
//! - [`GraphNode`] - Aggregate and value-member node payloads
//! - [`EdgeInfo`] / [`EdgeKind`] / [`EdgeAttrs`] - Typed, attributed edges
//! - [`SchemaGraph`] - The immutable node/edge store with validated construction
//!
//! The graph is read-only after construction. It stores nodes and edges in
//! persistent collections, so cloning a built graph is O(1) and clones can
//! be handed to other threads without locking.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod edge;
mod graph;
mod node;

pub use edge::{EdgeAttrs, EdgeInfo, EdgeKind, Multiplicity, VariationTag};
pub use graph::SchemaGraph;
pub use node::{AggregateNode, GraphNode, MemberNode, NodeId};
