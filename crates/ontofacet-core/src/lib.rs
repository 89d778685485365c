//! ontofacet-core: shared types for the faceted match engine.
//!
//! This crate holds everything the store adapters and the engine agree on:
//! facet categories with their closure rules, queries, graph entities,
//! [`MatchSet`] / [`Constraint`], request errors and configuration.
//!
//! # Architecture
//!
//! ```text
//! SearchRequest ──► Facet Resolver ×4 ──┐
//!        │                              ├──► Combinator ──► Record Hydrator
//!        └────────► Text Resolver ──────┘
//! ```
//!
//! Resolvers call into the store through the traits in `ontofacet-store`;
//! every branch runs as its own tokio task.

pub mod config;
pub mod error;
pub mod match_set;
pub mod types;

pub use error::RequestError;
pub use match_set::{Constraint, MatchSet};
pub use types::{
    ClosureRule, FacetCategory, FacetQuery, Hop, Operation, PatternKind, Record, RecordProjection,
    Relation, Repeat, SearchRequest, TargetLabel, Term, TextPattern, TextQuery,
};
