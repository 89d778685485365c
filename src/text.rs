//! Text resolver: matches free-text terms against record fields.

use crate::combinator::Branch;
use crate::error::SearchError;
use crate::session::SessionPool;
use ontofacet_core::{Constraint, Operation, TextPattern, TextQuery};
use ontofacet_store::RecordStore;
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Clone)]
pub struct TextResolver {
    records: Arc<dyn RecordStore>,
    sessions: SessionPool,
}

impl TextResolver {
    pub fn new(records: Arc<dyn RecordStore>, sessions: SessionPool) -> Self {
        Self { records, sessions }
    }

    /// Each term is matched on its own; the per-term sets are unioned for OR
    /// and intersected for AND. No terms means no text constraint.
    pub async fn resolve(&self, query: &TextQuery) -> Result<Constraint, SearchError> {
        if !query.is_requested() {
            return Ok(Constraint::Unconstrained);
        }

        let mut tasks = JoinSet::new();
        for term in &query.terms {
            let pattern = TextPattern::parse(term);
            let records = Arc::clone(&self.records);
            let sessions = self.sessions.clone();
            tasks.spawn(async move {
                sessions
                    .run(records.match_text(&pattern))
                    .await
                    .map_err(|source| SearchError::Oracle { branch: Branch::Text, source })
            });
        }

        let mut acc: Option<Constraint> = None;
        while let Some(joined) = tasks.join_next().await {
            let matched = Constraint::Matched(joined??);
            acc = Some(match (acc, query.operation) {
                (None, _) => matched,
                (Some(prev), Operation::Or) => prev.union(matched),
                (Some(prev), Operation::And) => prev.intersect(matched),
            });
        }

        let out = acc.unwrap_or(Constraint::Unconstrained);
        tracing::debug!(
            terms = query.terms.len(),
            op = %query.operation,
            empty = out.is_empty_match(),
            "text query resolved"
        );
        Ok(out)
    }
}
