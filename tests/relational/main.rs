//! Integration tests for Layer 3: Relational
//!
//! Tests column projection and navigation derivation over built schemas.

mod columns;
