//! Facet resolver: turns one category's inputs into a [`Constraint`].
//!
//! OR sends every input to the oracle as a single seed set. AND resolves
//! each input as its own traversal, one task per input, and intersects the
//! results.

use crate::combinator::Branch;
use crate::error::SearchError;
use crate::session::SessionPool;
use ontofacet_core::{Constraint, FacetQuery, MatchSet, Operation, TargetLabel};
use ontofacet_store::{SeedSelector, TraversalOracle};
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Clone)]
pub struct FacetResolver {
    oracle: Arc<dyn TraversalOracle>,
    sessions: SessionPool,
}

impl FacetResolver {
    pub fn new(oracle: Arc<dyn TraversalOracle>, sessions: SessionPool) -> Self {
        Self { oracle, sessions }
    }

    pub async fn resolve(&self, query: &FacetQuery) -> Result<Constraint, SearchError> {
        if !query.is_requested() {
            return Ok(Constraint::Unconstrained);
        }

        let matched = match query.operation {
            Operation::Or => self.traverse(query, SeedSelector::new(query.inputs.iter().cloned())).await?,
            Operation::And => self.resolve_each(query).await?,
        };

        tracing::debug!(
            category = %query.category,
            op = %query.operation,
            inputs = query.inputs.len(),
            matched = matched.len(),
            "facet resolved"
        );
        Ok(Constraint::Matched(matched))
    }

    async fn resolve_each(&self, query: &FacetQuery) -> Result<MatchSet, SearchError> {
        let mut tasks = JoinSet::new();
        for input in &query.inputs {
            let resolver = self.clone();
            let query = query.clone();
            let seeds = SeedSelector::new([input.clone()]);
            tasks.spawn(async move { resolver.traverse(&query, seeds).await });
        }

        let mut acc = Constraint::Unconstrained;
        while let Some(joined) = tasks.join_next().await {
            let matched = joined??;
            acc = acc.intersect(Constraint::Matched(matched));
            // Nothing left to intersect away; remaining tasks abort on drop.
            if acc.is_empty_match() {
                break;
            }
        }
        Ok(acc.into_match_set())
    }

    async fn traverse(&self, query: &FacetQuery, seeds: SeedSelector) -> Result<MatchSet, SearchError> {
        let rule = query.category.closure_rule();
        self.sessions
            .run(self.oracle.traverse(&seeds, rule, TargetLabel::Record))
            .await
            .map_err(|source| SearchError::Oracle { branch: Branch::Facet(query.category), source })
    }
}
