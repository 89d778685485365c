//! ontofacet-store: backends the match engine queries.
//!
//! The engine only sees two capabilities: a [`TraversalOracle`] that expands
//! seed terms along a [`ClosureRule`] to record ids, and a [`RecordStore`]
//! that hydrates records and answers free-text matches. [`MemoryGraph`]
//! implements both over a graph snapshot loaded by [`StoreClient`].

pub mod catalog;
pub mod client;
pub mod error;
pub mod memory;
pub mod snapshot;

use async_trait::async_trait;
use ontofacet_core::{ClosureRule, MatchSet, Record, RecordProjection, TargetLabel, TextPattern};

pub use catalog::{CatalogTotals, FacetMetric, Page};
pub use client::{SnapshotSource, StoreClient};
pub use error::{Result, StoreError};
pub use memory::MemoryGraph;
pub use snapshot::GraphSnapshot;

/// Which terms a traversal starts from.
///
/// A term is a seed if its id is one of `inputs`, or its name contains any
/// of `inputs` as a case-sensitive substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSelector {
    inputs: Vec<String>,
}

impl SeedSelector {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { inputs: inputs.into_iter().map(Into::into).collect() }
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn matches(&self, id: &str, name: &str) -> bool {
        self.inputs.iter().any(|i| i == id || name.contains(i.as_str()))
    }
}

/// Expands seed terms through the graph.
#[async_trait]
pub trait TraversalOracle: Send + Sync {
    /// Ids of `target` nodes reachable from the seeds by following `rule`.
    async fn traverse(
        &self,
        seeds: &SeedSelector,
        rule: ClosureRule,
        target: TargetLabel,
    ) -> Result<MatchSet>;
}

/// Record lookup and free-text matching.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Records whose id is in `ids`. Unknown ids are skipped.
    async fn fetch_by_ids(&self, ids: &MatchSet, projection: RecordProjection)
        -> Result<Vec<Record>>;

    /// Ids of records with any text field matching `pattern`.
    async fn match_text(&self, pattern: &TextPattern) -> Result<MatchSet>;
}
