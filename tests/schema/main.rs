//! Integration tests for Layer 2: Schema
//!
//! Tests for the declaration bag, the builder's error accumulation, and
//! the structural queries over built graphs.

mod queries;
