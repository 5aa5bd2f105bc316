use thiserror::Error;

/// Result alias for sync operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Canonical error surface for the sync pipeline.
///
/// Every variant is terminal for the run: the binary boundary maps any of
/// them to a non-zero exit. Secrets written before the failure stay in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no parameter names provided")]
    NoParameters,
    #[error("invalid parameter descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("parameter {parameter} derives an empty secret name")]
    EmptyDerivedName { parameter: String },
    #[error("derived name {derived} has no '_' separator")]
    MissingSplitSeparator { derived: String },
    #[error("{field} is empty after splitting derived name {derived}")]
    EmptySplitSegment { field: &'static str, derived: String },
    #[error("parameter {parameter} is not a JSON object of string values: {message}")]
    InvalidJson { parameter: String, message: String },
    #[error("parameters could not be read: {0}")]
    UnreadableParameters(String),
    #[error("fetch error: {0}")]
    Fetch(String),
    #[error("store error: {0}")]
    Store(String),
}
