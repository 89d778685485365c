//! Errors surfaced by a search request.
//!
//! Any branch failure fails the whole request. There is no partial result:
//! dropping a failed branch would turn "intersect with nothing" into "ignore
//! this facet".

use crate::combinator::Branch;
use ontofacet_core::RequestError;
use ontofacet_store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Why a single store query did not produce an answer.
#[derive(Debug, Error)]
pub enum QueryFailure {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("store session pool closed")]
    PoolClosed,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("{branch} query failed: {source}")]
    Oracle {
        branch: Branch,
        #[source]
        source: QueryFailure,
    },

    #[error("record hydration failed: {0}")]
    Hydration(#[source] QueryFailure),

    #[error("search task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl SearchError {
    /// The group whose query failed, if the failure belongs to one.
    pub fn branch(&self) -> Option<Branch> {
        match self {
            SearchError::Oracle { branch, .. } => Some(*branch),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            SearchError::Oracle { source: QueryFailure::Timeout(_), .. }
                | SearchError::Hydration(QueryFailure::Timeout(_))
        )
    }
}
