//! Catalog queries over a [`MemoryGraph`]: hierarchy lookups and per-facet
//! term counts used to populate filter pickers.

use crate::error::{Result, StoreError};
use crate::memory::MemoryGraph;
use ontofacet_core::{FacetCategory, Relation, Term};
use serde::Serialize;
use std::collections::BTreeMap;

/// How many records reference a term through one facet relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetMetric {
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// Catalog-wide totals shown alongside the per-facet metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogTotals {
    pub experiments: usize,
    pub total_cells: u64,
}

/// A window over a sorted result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub const DEFAULT_LIMIT: usize = 25;

    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Every item, unwindowed.
    pub fn all() -> Self {
        Self { offset: 0, limit: usize::MAX }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { offset: 0, limit: Self::DEFAULT_LIMIT }
    }
}

impl MemoryGraph {
    fn require(&self, id: &str) -> Result<usize> {
        self.index_of(id)
            .ok_or_else(|| StoreError::UnknownTerm(id.to_string()))
    }

    /// Terms reachable from `id` by zero or more `child` edges that link to
    /// at least one record.
    pub fn descendants(&self, id: &str) -> Result<Vec<&Term>> {
        let start = self.require(id)?;
        Ok(self
            .reach(Relation::Child, &[start])
            .into_iter()
            .map(|i| self.term_at(i))
            .filter(|t| !t.links.is_empty())
            .collect())
    }

    /// Terms reachable from `id` by zero or more `parent` edges, the term
    /// itself included.
    pub fn ancestors(&self, id: &str) -> Result<Vec<&Term>> {
        let start = self.require(id)?;
        Ok(self
            .reach(Relation::Parent, &[start])
            .into_iter()
            .map(|i| self.term_at(i))
            .collect())
    }

    /// True if either term reaches the other through `child` edges. A term
    /// is related to itself.
    pub fn has_relation(&self, a: &str, b: &str) -> Result<bool> {
        let (ia, ib) = (self.require(a)?, self.require(b)?);
        Ok(self.reach(Relation::Child, &[ia]).contains(&ib)
            || self.reach(Relation::Child, &[ib]).contains(&ia))
    }

    /// Record counts per directly referenced term of `category`, most used
    /// first, ties broken by id.
    pub fn facet_metrics(&self, category: FacetCategory) -> Vec<FacetMetric> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in self.records() {
            for id in record.links(category) {
                *counts.entry(id.as_str()).or_default() += 1;
            }
        }

        let mut metrics: Vec<FacetMetric> = counts
            .into_iter()
            .map(|(id, count)| FacetMetric {
                id: id.to_string(),
                name: self.term(id).map(|t| t.name.clone()).unwrap_or_default(),
                count,
            })
            .collect();
        metrics.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.id.cmp(&b.id)));
        metrics
    }

    /// Sum of `number_of_cells` over every record; records without a count
    /// contribute nothing.
    pub fn total_cells(&self) -> u64 {
        self.records().filter_map(|r| r.number_of_cells).sum()
    }

    pub fn totals(&self) -> CatalogTotals {
        CatalogTotals { experiments: self.record_count(), total_cells: self.total_cells() }
    }

    /// Terms from `vocabularies` whose name contains `fragment`, ignoring
    /// case, sorted by name and windowed by `page`. An empty vocabulary list
    /// accepts every source.
    pub fn term_lookup(&self, vocabularies: &[String], fragment: &str, page: Page) -> Vec<&Term> {
        let needle = fragment.to_lowercase();
        let mut found: Vec<&Term> = self
            .terms()
            .iter()
            .filter(|t| vocabularies.is_empty() || vocabularies.iter().any(|v| *v == t.source))
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        found.into_iter().skip(page.offset).take(page.limit).collect()
    }
}
