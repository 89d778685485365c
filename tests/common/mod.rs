//! Shared test utilities for ontofacet integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. The fake store is deterministic under
//! `tokio::time::pause()`.

pub mod assertions;
pub mod builders;
pub mod fake_store;
pub mod fixtures;

pub use builders::*;
pub use fake_store::*;
pub use fixtures::*;
