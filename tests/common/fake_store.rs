//! FakeStore: a scriptable [`TraversalOracle`] + [`RecordStore`].
//!
//! Answers come from a real [`MemoryGraph`]; individual inputs can be made
//! to fail or to stall, and every call is counted. Stalls use
//! `tokio::time::sleep`, so tests can run under `tokio::time::pause()`.

use async_trait::async_trait;
use ontofacet::{
    ClosureRule, EngineOptions, MatchSet, MemoryGraph, Record, RecordProjection, RecordStore,
    SearchEngine, SeedSelector, StoreError, TargetLabel, TextPattern, TraversalOracle,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
enum Fault {
    Fail,
    Stall(Duration),
}

pub struct FakeStore {
    graph: MemoryGraph,
    faults: HashMap<String, Fault>,
    latency: Duration,
    traversals: AtomicUsize,
    text_matches: AtomicUsize,
    fetches: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeStore {
    pub fn new(graph: MemoryGraph) -> Self {
        Self {
            graph,
            faults: HashMap::new(),
            latency: Duration::ZERO,
            traversals: AtomicUsize::new(0),
            text_matches: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Any traversal seeded with `input`, or text match whose needle equals
    /// `input`, fails with [`StoreError::Unavailable`].
    pub fn fail_on(mut self, input: &str) -> Self {
        self.faults.insert(input.to_string(), Fault::Fail);
        self
    }

    /// Calls involving `input` sleep for `delay` before answering.
    pub fn stall_on(mut self, input: &str, delay: Duration) -> Self {
        self.faults.insert(input.to_string(), Fault::Stall(delay));
        self
    }

    /// Every call sleeps for `latency` before answering.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn traversals(&self) -> usize {
        self.traversals.load(Ordering::SeqCst)
    }

    pub fn text_matches(&self) -> usize {
        self.text_matches.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Most calls ever running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn enter<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a str>,
    ) -> Result<InFlight<'_>, StoreError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);

        let fault = keys.into_iter().find_map(|k| self.faults.get(k).copied());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match fault {
            Some(Fault::Fail) => Err(StoreError::Unavailable("scripted failure".into())),
            Some(Fault::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(guard)
            }
            None => Ok(guard),
        }
    }
}

/// Decrements the in-flight count when a call finishes or is cancelled.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl TraversalOracle for FakeStore {
    async fn traverse(
        &self,
        seeds: &SeedSelector,
        rule: ClosureRule,
        target: TargetLabel,
    ) -> Result<MatchSet, StoreError> {
        self.traversals.fetch_add(1, Ordering::SeqCst);
        let _guard = self.enter(seeds.inputs().iter().map(String::as_str)).await?;
        self.graph.expand(seeds, rule, target)
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn fetch_by_ids(
        &self,
        ids: &MatchSet,
        projection: RecordProjection,
    ) -> Result<Vec<Record>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let _guard = self.enter(ids.iter()).await?;
        self.graph.fetch_by_ids(ids, projection).await
    }

    async fn match_text(&self, pattern: &TextPattern) -> Result<MatchSet, StoreError> {
        self.text_matches.fetch_add(1, Ordering::SeqCst);
        let _guard = self.enter([pattern.needle.as_str()]).await?;
        self.graph.match_text(pattern).await
    }
}

/// An engine whose traversals and record lookups both go to `store`.
pub fn fake_engine(store: &Arc<FakeStore>, options: EngineOptions) -> SearchEngine {
    SearchEngine::new(store.clone(), store.clone(), options)
}
