//! Canopy - Schema-driven generator core
//!
//! This crate re-exports all layers of the Canopy system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: canopy_command    — Key trees, command trees, path rewriting
//! Layer 3: canopy_relational — Column projection, navigation derivation
//! Layer 2: canopy_schema     — Declaration bag, builder, structural queries
//! Layer 1: canopy_graph      — Validated immutable schema graph
//! Layer 0: canopy_foundation — Core types (TreePath, errors, value types)
//! ```

pub use canopy_command as command;
pub use canopy_foundation as foundation;
pub use canopy_graph as graph;
pub use canopy_relational as relational;
pub use canopy_schema as schema;
