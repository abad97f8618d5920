use thiserror::Error;

/// Errors raised while parsing user-supplied values into domain types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognized date '{0}' (expected a format like 2024-01-31)")]
    Date(String),
    #[error("unrecognized status '{0}' (expected pending, active or completed)")]
    Status(String),
}
