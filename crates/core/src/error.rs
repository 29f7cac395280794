//! Error types for the orbit tracker.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the orbit tracker.
#[derive(Error, Debug)]
pub enum Error {
    /// Feed could not be fetched or is malformed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Caller supplied a non-numeric or unparseable value.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Limit/offset outside the series bounds.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Aggregate requested over a series with no records.
    #[error("Empty series")]
    EmptySeries,

    /// Lookup miss.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Ground location could not be derived.
    #[error("Locate error: {0}")]
    Locate(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create an out of range error.
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Error::OutOfRange(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create a locate error.
    pub fn locate(msg: impl Into<String>) -> Self {
        Error::Locate(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a database error.
    pub fn database(msg: impl Into<String>) -> Self {
        Error::Database(msg.into())
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Parse(_) => "parse_error",
            Error::InvalidInput(_) => "invalid_input",
            Error::OutOfRange(_) => "out_of_range",
            Error::EmptySeries => "empty_series",
            Error::NotFound(_) => "not_found",
            Error::Locate(_) => "locate_error",
            Error::Config(_) => "config_error",
            Error::Database(_) => "database_error",
            Error::Io(_) => "io_error",
            Error::Json(_) => "json_error",
        }
    }
}

impl Clone for Error {
    /// Wrapped I/O and JSON errors are rebuilt from their kind and message.
    fn clone(&self) -> Self {
        match self {
            Error::Parse(m) => Error::Parse(m.clone()),
            Error::InvalidInput(m) => Error::InvalidInput(m.clone()),
            Error::OutOfRange(m) => Error::OutOfRange(m.clone()),
            Error::EmptySeries => Error::EmptySeries,
            Error::NotFound(m) => Error::NotFound(m.clone()),
            Error::Locate(m) => Error::Locate(m.clone()),
            Error::Config(m) => Error::Config(m.clone()),
            Error::Database(m) => Error::Database(m.clone()),
            Error::Io(e) => Error::Io(std::io::Error::new(e.kind(), e.to_string())),
            Error::Json(e) => Error::Json(<serde_json::Error as serde::de::Error>::custom(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_message() {
        let err = Error::out_of_range("offset -1 outside 1..10");
        assert_eq!(err.to_string(), "Out of range: offset -1 outside 1..10");
        assert_eq!(err.kind(), "out_of_range");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_clone_keeps_kind_and_message() {
        let err = Error::parse("feed returned 503");
        let copy = err.clone();
        assert_eq!(copy.kind(), "parse_error");
        assert_eq!(copy.to_string(), err.to_string());

        let io: Error = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow").into();
        match io.clone() {
            Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::TimedOut),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
