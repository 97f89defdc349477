//! Unified error types for strips-mcp.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the strips-mcp server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty date argument).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Identifier is neither `latest` nor a calendar date in `YYYY-MM-DD` form.
    #[error("INVALID_DATE: {0}")]
    InvalidDate(String),

    /// Transport failure, timeout, or non-success HTTP status.
    #[error("FETCH_FAILED: {0}")]
    FetchFailed(String),

    /// Fetched page is missing a required field.
    #[error("MALFORMED_PAGE: {0}")]
    MalformedPage(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidDate(msg) => (-32000, msg.clone()),
            Error::FetchFailed(msg) => (-32001, msg.clone()),
            Error::MalformedPage(msg) => (-32002, msg.clone()),
            Error::Database(e) => (-32003, e.to_string()),
            Error::MigrationFailed(msg) => (-32003, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDate("2019-13-41".to_string());
        assert!(err.to_string().contains("INVALID_DATE"));
        assert!(err.to_string().contains("2019-13-41"));
    }

    #[test]
    fn test_malformed_page_display() {
        let err = Error::MalformedPage("no image tag matched".to_string());
        assert!(err.to_string().contains("MALFORMED_PAGE"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::FetchFailed("status 503".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);
    }

    #[test]
    fn test_invalid_date_to_mcp_error() {
        let err = Error::InvalidDate("banana".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32000);
    }
}
