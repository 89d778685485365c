//! ontofacet: faceted ontology search over experiment records.
//!
//! A [`SearchRequest`] carries up to four facet groups (cell types,
//! diseases, tissues, organism) and a free-text group. Each requested facet
//! expands its inputs through the term hierarchy into record ids; free text
//! matches record fields directly. The per-group results are intersected
//! and the surviving records hydrated.
//!
//! # Architecture
//!
//! ```text
//! SearchRequest ──► FacetResolver ×4 ──┐
//!        │                             ├──► combinator ──► hydrate
//!        └────────► TextResolver ──────┘
//! ```
//!
//! Every branch runs as a tokio task; store queries go through a bounded
//! [`SessionPool`](session::SessionPool) with a per-query timeout.

pub mod combinator;
pub mod engine;
pub mod error;
pub mod facet;
pub mod session;
pub mod text;

pub use combinator::{combine, Branch, Combination};
pub use engine::{EngineOptions, SearchEngine};
pub use error::{QueryFailure, SearchError};

pub use ontofacet_core::config::Config;
pub use ontofacet_core::{
    ClosureRule, Constraint, FacetCategory, FacetQuery, MatchSet, Operation, Record,
    RecordProjection, RequestError, SearchRequest, TargetLabel, Term, TextPattern, TextQuery,
};
pub use ontofacet_store::{
    CatalogTotals, FacetMetric, GraphSnapshot, MemoryGraph, Page, RecordStore, SeedSelector,
    SnapshotSource, StoreClient, StoreError, TraversalOracle,
};
