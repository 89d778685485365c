//! Test builders: ergonomic constructors for terms, records and graphs.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use ontofacet::{
    EngineOptions, FacetCategory, GraphSnapshot, MemoryGraph, Record, SearchEngine, Term,
};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// TermBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Term`] fixtures.
///
/// ```rust
/// let t = TermBuilder::new("CL:0000084", "T cell")
///     .source("Cell Ontology")
///     .child("CL:0000624")
///     .build();
/// ```
pub struct TermBuilder {
    term: Term,
}

impl TermBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self { term: Term::new(id, name) }
    }

    pub fn source(mut self, source: &str) -> Self {
        self.term.source = source.to_string();
        self
    }

    /// Add an outgoing `child` edge to `id`.
    pub fn child(mut self, id: &str) -> Self {
        self.term.child.push(id.to_string());
        self
    }

    /// Link directly to a record.
    pub fn links(mut self, record: &str) -> Self {
        self.term.links.push(record.to_string());
        self
    }

    pub fn build(self) -> Term {
        self.term
    }
}

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new(id: &str, title: &str) -> Self {
        Self { record: Record::new(id, title) }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.record.name = name.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.record.description = description.to_string();
        self
    }

    pub fn keywords(mut self, keywords: &str) -> Self {
        self.record.keywords = keywords.to_string();
        self
    }

    pub fn cells(mut self, n: u64) -> Self {
        self.record.number_of_cells = Some(n);
        self
    }

    /// Reference a term through `category`'s record relation.
    pub fn facet(mut self, category: FacetCategory, term: &str) -> Self {
        let links = match category {
            FacetCategory::CellTypes => &mut self.record.celltypes,
            FacetCategory::Diseases => &mut self.record.diseases,
            FacetCategory::Tissues => &mut self.record.tissues,
            FacetCategory::Organism => &mut self.record.organism,
        };
        links.push(term.to_string());
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Collects terms and records, then indexes them into a [`MemoryGraph`].
#[derive(Default)]
pub struct GraphBuilder {
    snapshot: GraphSnapshot,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(mut self, term: TermBuilder) -> Self {
        self.snapshot = self.snapshot.term(term.build());
        self
    }

    pub fn record(mut self, record: RecordBuilder) -> Self {
        self.snapshot = self.snapshot.record(record.build());
        self
    }

    pub fn snapshot(self) -> GraphSnapshot {
        self.snapshot
    }

    pub fn build(self) -> MemoryGraph {
        MemoryGraph::from_snapshot(self.snapshot).expect("fixture graph must be valid")
    }

    pub fn engine(self) -> SearchEngine {
        SearchEngine::from_graph(Arc::new(self.build()), test_options())
    }
}

/// Engine options for harnesses: a few sessions, short timeout, short-circuit on.
pub fn test_options() -> EngineOptions {
    EngineOptions {
        max_sessions: 4,
        query_timeout: Duration::from_secs(2),
        short_circuit_empty: true,
    }
}
