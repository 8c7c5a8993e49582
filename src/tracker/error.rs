use thiserror::Error;

/// Recoverable, per-action failures. None of these abort the process; the
/// presentation layer maps each variant to a transient notification and the
/// user simply retries the action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("an epic named `{0}` already exists")]
    DuplicateName(String),
    #[error("epic name is empty")]
    EmptyName,
    #[error("active session has no start timestamp")]
    MissingStartTimestamp,
}
