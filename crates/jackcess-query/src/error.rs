use thiserror::Error;

/// A structural problem in a query's row set. The caller never sees this
/// directly: [`crate::reconstruct`] catches it and degrades the query to
/// [`crate::QueryKind::Unknown`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("duplicate {0:?} record; at most one is allowed")]
    DuplicateSingularRecord(crate::row::Attribute),
    #[error("unknown join flag {0}")]
    UnknownJoinFlag(i16),
    #[error("join combination has mismatched flags")]
    MismatchedJoinFlags,
    #[error("missing union sub-query {0:?}")]
    MissingUnionSubQuery(&'static str),
    #[error("{0}")]
    Other(String),
}
