//! Core types for the Canopy schema compiler.
//!
//! This crate provides:
//! - [`TreePath`] - Hierarchical paths addressing aggregates and members
//! - [`SchemaError`] / [`SchemaReport`] - Accumulated, path-addressable input errors
//! - [`Defect`] - Loud failures for graph states the algorithms do not recognize
//! - [`ValueType`] / [`TypeRegistry`] - Pluggable value-member type descriptors

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod path;
pub mod types;

pub use error::{Defect, SchemaError, SchemaErrorKind, SchemaReport};
pub use path::TreePath;
pub use types::{PrimitiveKind, TypeRegistry, ValueType};
