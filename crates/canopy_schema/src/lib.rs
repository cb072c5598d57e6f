//! Declaration intake and schema compilation for Canopy.
//!
//! The flow is: front-end → [`DeclarationBag`] → [`SchemaBuilder`] →
//! [`CompiledSchema`] → structural queries ([`query`]) → derivations.
//!
//! The bag decouples declaration order from build order: attributes of an
//! aggregate or member may be declared in any sequence, and the builder
//! runs all structural validation in one pass, accumulating every error
//! before returning.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bag;
pub mod builder;
pub mod query;

pub use bag::{AggregateDecl, DeclarationBag, MemberDecl, OptionKey, OptionValue};
pub use builder::{CompiledSchema, SchemaBuilder};
pub use query::{ChildSlot, VariationGroup};
