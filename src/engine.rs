//! Search engine: fans a [`SearchRequest`] out into independent branches,
//! combines their constraints and hydrates the surviving records.
//!
//! Each requested facet category and the free-text query run as their own
//! task on a [`JoinSet`]. Unrequested groups spawn nothing. The first branch
//! error fails the request and aborts the others.

use crate::combinator::{Branch, Combination};
use crate::error::SearchError;
use crate::facet::FacetResolver;
use crate::session::SessionPool;
use crate::text::TextResolver;
use ontofacet_core::config::Config;
use ontofacet_core::{Constraint, MatchSet, Record, RecordProjection, SearchRequest};
use ontofacet_store::{MemoryGraph, RecordStore, TraversalOracle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Runtime knobs, normally taken from `[store]` and `[search]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub max_sessions: usize,
    pub query_timeout: Duration,
    pub short_circuit_empty: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&Config::defaults())
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_sessions: config.store.max_sessions,
            query_timeout: config.store.query_timeout(),
            short_circuit_empty: config.search.short_circuit_empty,
        }
    }
}

#[derive(Clone)]
pub struct SearchEngine {
    facets: FacetResolver,
    text: TextResolver,
    records: Arc<dyn RecordStore>,
    sessions: SessionPool,
    short_circuit_empty: bool,
}

impl SearchEngine {
    pub fn new(
        oracle: Arc<dyn TraversalOracle>,
        records: Arc<dyn RecordStore>,
        options: EngineOptions,
    ) -> Self {
        let sessions = SessionPool::new(options.max_sessions, options.query_timeout);
        Self {
            facets: FacetResolver::new(oracle, sessions.clone()),
            text: TextResolver::new(Arc::clone(&records), sessions.clone()),
            records,
            sessions,
            short_circuit_empty: options.short_circuit_empty,
        }
    }

    /// An engine answering both traversals and record lookups from one
    /// in-memory graph.
    pub fn from_graph(graph: Arc<MemoryGraph>, options: EngineOptions) -> Self {
        Self::new(graph.clone(), graph, options)
    }

    /// Ids of every record satisfying all requested groups.
    ///
    /// A request with no group at all yields the empty set.
    pub async fn match_ids(&self, request: &SearchRequest) -> Result<MatchSet, SearchError> {
        let started = Instant::now();
        let mut tasks: JoinSet<Result<(Branch, Constraint), SearchError>> = JoinSet::new();

        for query in request.facets().filter(|q| q.is_requested()) {
            let resolver = self.facets.clone();
            let query = query.clone();
            tasks.spawn(async move {
                let branch = Branch::Facet(query.category);
                resolver.resolve(&query).await.map(|c| (branch, c))
            });
        }
        if request.text.is_requested() {
            let resolver = self.text.clone();
            let query = request.text.clone();
            tasks.spawn(async move { resolver.resolve(&query).await.map(|c| (Branch::Text, c)) });
        }

        let spawned = tasks.len();
        let mut combination = Combination::new();
        while let Some(joined) = tasks.join_next().await {
            let (branch, constraint) = match joined? {
                Ok(done) => done,
                Err(err) => {
                    tracing::warn!(error = %err, "search branch failed");
                    return Err(err);
                }
            };
            combination.record(branch, constraint);

            if self.short_circuit_empty && combination.is_decided_empty() {
                tracing::debug!(%branch, pending = tasks.len(), "result already empty, cancelling pending branches");
                break;
            }
        }

        let ids = combination.into_match_set();
        tracing::info!(
            branches = spawned,
            matched = ids.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search complete"
        );
        Ok(ids)
    }

    /// Full records for every id [`match_ids`](Self::match_ids) returns.
    pub async fn search_records(&self, request: &SearchRequest) -> Result<Vec<Record>, SearchError> {
        let ids = self.match_ids(request).await?;
        self.hydrate(&ids, RecordProjection::Full).await
    }

    pub async fn hydrate(
        &self,
        ids: &MatchSet,
        projection: RecordProjection,
    ) -> Result<Vec<Record>, SearchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.sessions
            .run(self.records.fetch_by_ids(ids, projection))
            .await
            .map_err(SearchError::Hydration)
    }
}
