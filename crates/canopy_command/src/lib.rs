//! Key and command trees for a validated schema graph.
//!
//! A key tree mirrors the aggregate hierarchy restricted to identity
//! members. A command tree mirrors it restricted to whatever a mutation
//! needs: creates drop auto-assigned members, updates carry everything
//! plus a version token, deletes carry only keys and the token. The
//! rewrite module turns tree field paths into relational column paths so
//! records and commands translate without duplicated projection logic.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command_tree;
pub mod key_tree;
pub mod rewrite;

pub use command_tree::{command_tree_of, CommandNode, CommandTree, MutationKind};
pub use key_tree::{key_tree_of, KeyNode, KeyTree};
pub use rewrite::{key_leaf_paths, rewrite_to_columns, PathStep};
