//! Hierarchical paths for addressing aggregates and members.
//!
//! A [`TreePath`] is the declaration-side identity of a schema element:
//! `/Order/Line/Qty` addresses the member `Qty` of the aggregate `Line`
//! nested under the root aggregate `Order`. Paths are the keys of the
//! declaration bag and the source of graph node identities.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Separator used in the textual form of a path.
pub const PATH_SEPARATOR: char = '/';

/// An ordered list of name segments addressing one schema element.
///
/// Paths are cheap to clone and compare. Segment names may not contain
/// the separator character or be empty; [`TreePath::parse`] enforces this.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreePath {
    segments: Vec<String>,
}

impl TreePath {
    /// Creates a root path with a single segment.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Parses a textual path like `/Order/Line/Qty` or `Order/Line/Qty`.
    ///
    /// Returns `None` if the path is empty or any segment is empty.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.strip_prefix(PATH_SEPARATOR).unwrap_or(text);
        if trimmed.is_empty() {
            return None;
        }
        let segments: Vec<String> = trimmed.split(PATH_SEPARATOR).map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self { segments })
    }

    /// Builds a path from pre-split segments.
    ///
    /// Returns `None` if no segments are given or any segment is empty
    /// or contains the separator.
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return None;
        }
        if segments
            .iter()
            .any(|s| s.is_empty() || s.contains(PATH_SEPARATOR))
        {
            return None;
        }
        Some(Self { segments })
    }

    /// Returns the path of this element's parent, or `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Extends this path with one more segment.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// The last segment: the element's own name.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.segments
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// True if this path has exactly one segment.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Iterates the segments from root to leaf.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// True if `other` is a strict prefix of this path.
    #[must_use]
    pub fn is_descendant_of(&self, other: &Self) -> bool {
        self.segments.len() > other.segments.len()
            && self.segments[..other.segments.len()] == other.segments[..]
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{PATH_SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}
