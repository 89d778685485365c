//! MemoryGraph: an immutable in-memory term/record graph.
//!
//! Built once from a [`GraphSnapshot`], then shared read-only across every
//! concurrent query. Term ids resolve through an FST index; name fragments
//! are matched by a linear scan since `contains` has no prefix structure to
//! exploit.

use crate::error::{Result, StoreError};
use crate::snapshot::GraphSnapshot;
use crate::{RecordStore, SeedSelector, TraversalOracle};
use async_trait::async_trait;
use ontofacet_core::{
    ClosureRule, FacetCategory, MatchSet, Record, RecordProjection, Relation, Repeat, TargetLabel,
    Term, TextPattern,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

pub struct MemoryGraph {
    terms: Vec<Term>,
    /// Term id → index into `terms`.
    id_index: fst::Map<Vec<u8>>,
    children: Vec<Vec<usize>>,
    parents: Vec<Vec<usize>>,
    records: BTreeMap<String, Record>,
}

impl std::fmt::Debug for MemoryGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGraph")
            .field("terms", &self.terms.len())
            .field("records", &self.records.len())
            .finish()
    }
}

impl MemoryGraph {
    /// Validate and index a snapshot.
    ///
    /// Every `child`, `parent` and record facet reference must name a defined
    /// term, and every term `links` entry a defined record. Record facet
    /// references are folded into the referenced term's `links`, and `parent`
    /// edges are completed as the reverse of `child`.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
        let GraphSnapshot { mut terms, records } = snapshot;

        let mut by_id: HashMap<String, usize> = HashMap::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            if by_id.insert(term.id.clone(), i).is_some() {
                return Err(StoreError::DuplicateTerm(term.id.clone()));
            }
        }
        let lookup = |id: &str| {
            by_id
                .get(id)
                .copied()
                .ok_or_else(|| StoreError::UnknownTerm(id.to_string()))
        };

        let mut record_map = BTreeMap::new();
        for record in records {
            let id = record.id.clone();
            if record_map.insert(id.clone(), record).is_some() {
                return Err(StoreError::DuplicateRecord(id));
            }
        }

        let mut children = vec![Vec::new(); terms.len()];
        let mut parents = vec![Vec::new(); terms.len()];
        for (i, term) in terms.iter().enumerate() {
            for child in &term.child {
                let j = lookup(child)?;
                children[i].push(j);
                parents[j].push(i);
            }
            for parent in &term.parent {
                let j = lookup(parent)?;
                parents[i].push(j);
                children[j].push(i);
            }
            if let Some(missing) = term.links.iter().find(|r| !record_map.contains_key(*r)) {
                return Err(StoreError::UnknownRecord(missing.clone()));
            }
        }
        for adj in children.iter_mut().chain(parents.iter_mut()) {
            adj.sort_unstable();
            adj.dedup();
        }

        for record in record_map.values() {
            for category in FacetCategory::ALL {
                for term_id in record.links(category) {
                    terms[lookup(term_id)?].links.push(record.id.clone());
                }
            }
        }

        let ids_of = |adj: &[Vec<usize>], terms: &[Term]| -> Vec<Vec<String>> {
            adj.iter()
                .map(|js| js.iter().map(|&j| terms[j].id.clone()).collect())
                .collect()
        };
        let child_ids = ids_of(&children, &terms);
        let parent_ids = ids_of(&parents, &terms);
        for ((term, child), parent) in terms.iter_mut().zip(child_ids).zip(parent_ids) {
            term.child = child;
            term.parent = parent;
            term.links.sort_unstable();
            term.links.dedup();
        }

        let mut keyed: Vec<(&str, u64)> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i as u64))
            .collect();
        keyed.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
        let id_index = fst::Map::from_iter(keyed)?;

        tracing::info!(
            terms = terms.len(),
            records = record_map.len(),
            "memory graph: built"
        );

        Ok(Self {
            terms,
            id_index,
            children,
            parents,
            records: record_map,
        })
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn term(&self, id: &str) -> Option<&Term> {
        self.index_of(id).map(|i| &self.terms[i])
    }

    pub fn record(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.id_index.get(id).map(|i| i as usize)
    }

    pub(crate) fn term_at(&self, index: usize) -> &Term {
        &self.terms[index]
    }

    /// Terms reachable from `start` by zero or more `relation` edges.
    pub(crate) fn reach(&self, relation: Relation, start: &[usize]) -> BTreeSet<usize> {
        match self.edges(relation) {
            Some(edges) => closure(edges, start.iter().copied()),
            None => start.iter().copied().collect(),
        }
    }

    fn edges(&self, relation: Relation) -> Option<&[Vec<usize>]> {
        match relation {
            Relation::Child => Some(&self.children),
            Relation::Parent => Some(&self.parents),
            Relation::Links => None,
        }
    }

    fn seed_indices(&self, seeds: &SeedSelector) -> BTreeSet<usize> {
        let mut out: BTreeSet<usize> = seeds
            .inputs()
            .iter()
            .filter_map(|input| self.index_of(input))
            .collect();
        out.extend(
            self.terms
                .iter()
                .enumerate()
                .filter(|(_, t)| seeds.inputs().iter().any(|i| t.name.contains(i.as_str())))
                .map(|(i, _)| i),
        );
        out
    }

    /// Synchronous core of [`TraversalOracle::traverse`].
    ///
    /// The rule must end in exactly one `links>` hop; every earlier hop walks
    /// the term hierarchy.
    pub fn expand(
        &self,
        seeds: &SeedSelector,
        rule: ClosureRule,
        target: TargetLabel,
    ) -> Result<MatchSet> {
        let malformed = |reason| StoreError::MalformedFilter { rule: rule.to_string(), reason };

        let (last, walk) = rule
            .hops()
            .split_last()
            .ok_or_else(|| malformed("empty relation filter"))?;
        if last.relation != Relation::Links || last.repeat != Repeat::Once {
            return Err(malformed("filter must end with a single links> hop"));
        }

        let mut frontier = self.seed_indices(seeds);
        for hop in walk {
            let edges = self
                .edges(hop.relation)
                .ok_or_else(|| malformed("links> may only be the final hop"))?;
            frontier = match hop.repeat {
                Repeat::Once => frontier
                    .iter()
                    .flat_map(|&i| edges[i].iter().copied())
                    .collect(),
                Repeat::Closure => closure(edges, frontier),
            };
        }

        let ids = match target {
            TargetLabel::Record => frontier
                .iter()
                .flat_map(|&i| self.terms[i].links.iter().map(String::as_str))
                .collect(),
        };
        Ok(ids)
    }
}

fn closure(edges: &[Vec<usize>], start: impl IntoIterator<Item = usize>) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::new();
    for s in start {
        if seen.insert(s) {
            queue.push_back(s);
        }
    }
    while let Some(n) = queue.pop_front() {
        for &m in &edges[n] {
            if seen.insert(m) {
                queue.push_back(m);
            }
        }
    }
    seen
}

#[async_trait]
impl TraversalOracle for MemoryGraph {
    async fn traverse(
        &self,
        seeds: &SeedSelector,
        rule: ClosureRule,
        target: TargetLabel,
    ) -> Result<MatchSet> {
        let ids = self.expand(seeds, rule, target)?;
        tracing::debug!(
            rule = %rule,
            target = %target,
            inputs = ?seeds.inputs(),
            matched = ids.len(),
            "memory graph: traverse"
        );
        Ok(ids)
    }
}

#[async_trait]
impl RecordStore for MemoryGraph {
    async fn fetch_by_ids(
        &self,
        ids: &MatchSet,
        projection: RecordProjection,
    ) -> Result<Vec<Record>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id))
            .map(|r| r.clone().project(projection))
            .collect())
    }

    async fn match_text(&self, pattern: &TextPattern) -> Result<MatchSet> {
        let ids: MatchSet = self
            .records
            .values()
            .filter(|r| r.matches_text(pattern))
            .map(|r| r.id.as_str())
            .collect();
        tracing::debug!(needle = %pattern.needle, matched = ids.len(), "memory graph: match text");
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
