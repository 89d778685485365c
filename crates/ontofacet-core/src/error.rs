//! Request validation errors.

use thiserror::Error;

/// A request that cannot be run as given. Raised before any store query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("invalid operation {token:?} for {group}: expected AND or OR")]
    InvalidOperation { group: String, token: String },

    #[error("unknown facet category {0:?}")]
    UnknownCategory(String),
}
