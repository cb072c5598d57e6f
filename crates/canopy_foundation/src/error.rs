//! Error types for schema compilation.
//!
//! Two distinct failure channels exist:
//!
//! - [`SchemaError`] / [`SchemaReport`] - problems in user input. These are
//!   accumulated across the whole build so a user can fix every problem in
//!   one edit cycle; each carries the offending path.
//! - [`Defect`] - an already-validated graph reaching a derivation function
//!   in a state the algorithm does not recognize. These indicate a builder
//!   bug, not user input, and propagate immediately.

use std::fmt;

use thiserror::Error;

use crate::path::TreePath;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Categorized schema input errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SchemaErrorKind {
    /// No application name was declared.
    #[error("application name is not set")]
    MissingApplicationName,

    /// Two aggregates resolve to the same identity.
    #[error("duplicate aggregate '{0}'")]
    DuplicateAggregate(String),

    /// A value member was declared without a type.
    #[error("member '{0}' has no declared type")]
    MissingMemberType(String),

    /// A value member's type name is not in the registry.
    #[error("member '{member}' has unknown type '{type_name}'")]
    UnknownMemberType {
        /// The member's name.
        member: String,
        /// The unresolved type name.
        type_name: String,
    },

    /// An edge endpoint does not resolve to a declared node.
    #[error("no definition found for '{0}'")]
    UnresolvedEndpoint(String),

    /// Two variants in one variation group share a discriminator value.
    #[error("duplicate discriminator '{switch}' in variation group '{group}'")]
    DuplicateDiscriminator {
        /// The variation group's name.
        group: String,
        /// The duplicated discriminator value.
        switch: String,
    },

    /// A variant member was declared without its discriminator value.
    #[error("variant of group '{0}' has no discriminator value")]
    MissingDiscriminator(String),

    /// A declaration path could not be parsed.
    #[error("invalid path '{0}'")]
    InvalidPath(String),

    /// Two graph nodes share an identity.
    #[error("duplicate node '{0}'")]
    DuplicateNode(String),
}

/// One schema input error with the declaration it is attributable to.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchemaError {
    /// What went wrong.
    pub kind: SchemaErrorKind,
    /// The offending declaration, when one can be named.
    pub path: Option<TreePath>,
}

impl SchemaError {
    /// Creates an error without path context.
    #[must_use]
    pub fn new(kind: SchemaErrorKind) -> Self {
        Self { kind, path: None }
    }

    /// Creates an error attributed to a declaration path.
    #[must_use]
    pub fn at(kind: SchemaErrorKind, path: TreePath) -> Self {
        Self {
            kind,
            path: Some(path),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// The builder's failure channel: every error found in one build pass.
///
/// Duplicate entries are dropped so one underlying mistake surfaced through
/// several declarations reads as one message per (kind, path) pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchemaReport {
    errors: Vec<SchemaError>,
}

impl SchemaReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error. Exact duplicates are ignored.
    pub fn push(&mut self, error: SchemaError) {
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    /// Absorbs all errors from another report.
    pub fn merge(&mut self, other: Self) {
        for error in other.errors {
            self.push(error);
        }
    }

    /// True if no error has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates the recorded errors in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.errors.iter()
    }
}

impl fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}

impl IntoIterator for SchemaReport {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// A graph state the derivation algorithms do not recognize.
///
/// Derivations only ever run against an already-validated graph, so any of
/// these indicates a bug in the builder or in a derivation itself. They are
/// never shown to end users as input errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Defect {
    /// An edge is neither parent-child nor reference where one was required.
    #[error("edge '{0}' cannot be classified as a relationship")]
    UnclassifiableEdge(String),

    /// A recursive walk revisited an aggregate.
    #[error("cycle detected at '{0}' during derivation")]
    CycleDetected(String),

    /// A path rewrite attempted to walk backwards across a reference.
    #[error("path walks from reference target '{0}' back to its referrer")]
    BackwardReferencePath(String),

    /// A node id present in an edge is missing from the graph.
    #[error("node '{0}' is not in the graph")]
    UnknownNode(String),
}
