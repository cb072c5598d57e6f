//! Relational derivations over a validated schema graph.
//!
//! Two pure functions live here. [`columns_of`] flattens an aggregate into
//! an ordered list of relational columns, inheriting key columns from its
//! ancestors and its reference targets. [`navigations_of`] describes every
//! relationship the aggregate participates in as a principal/dependent pair
//! with delete behavior and foreign-key columns.
//!
//! Both run against an already validated graph. Any inconsistency they meet
//! is a [`Defect`](canopy_foundation::Defect), not a user error.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod navigation;
pub mod projection;

pub use navigation::{navigations_of, DeleteBehavior, NavigationEdge, NavigationSide};
pub use projection::{
    columns_of, primary_key_of, ColumnOrigin, ColumnRole, RelationalColumn,
};
