//! Integration tests for Layer 4: Command
//!
//! Tests key trees, per-operation command trees, and the path rewrite
//! that ties tree fields back to relational columns.

mod trees;
