//! On-disk / over-the-wire graph snapshot format.
//!
//! ```json
//! {
//!   "terms":   [{"id": "CL:0000236", "name": "B cell", "source": "Cell Ontology",
//!                "child": ["CL:0000785"]}],
//!   "records": [{"id": "GSE1", "title": "...", "celltypes": ["CL:0000785"]}]
//! }
//! ```
//!
//! Record facet references and term `links` describe the same edges; either
//! side may be given and [`MemoryGraph`](crate::MemoryGraph) merges them.

use ontofacet_core::{Record, Term};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub terms: Vec<Term>,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(mut self, term: Term) -> Self {
        self.terms.push(term);
        self
    }

    pub fn record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    pub fn from_json(bytes: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
