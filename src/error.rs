use thiserror::Error;

/// Failures surfaced by name-based lookups.
///
/// Aggregation queries operate on pre-validated ids and cannot fail; only
/// operations that resolve free-text names return these. The two kinds stay
/// distinct so callers can tell a search that matched nothing from a direct
/// lookup of a name the index has never seen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Fuzzy author search matched no names
    #[error("no author matches query: {0:?}")]
    NotFound(String),

    /// Exact author lookup missed
    #[error("unknown author: {0:?}")]
    UnknownAuthor(String),
}
