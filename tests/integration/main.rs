//! End-to-end integration tests
//!
//! Tests the full pipeline: declare into a bag, build the graph, derive
//! columns, navigations, and command trees, plus determinism properties.

mod pipeline;
