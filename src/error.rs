//! # Harvester Error Types
//!
//! Structured error handling for the harvest cycle using thiserror. Each
//! collaborator has its own error enum so that failures can be told apart
//! at the call site; [`HarvestError`] unifies them for the poll cycle.
//!
//! A checkpoint conflict (another writer already advanced past a cursor) is
//! not an error. It is reported as
//! [`AdvanceOutcome::Unchanged`](crate::checkpoint::AdvanceOutcome).

use crate::models::Cursor;
use thiserror::Error;

/// Failures raised by a [`CheckpointStore`](crate::checkpoint::CheckpointStore).
#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("Checkpoint store connection error: {message}")]
    Connection { message: String },

    #[error("Checkpoint store query error: {operation}: {message}")]
    Query { operation: String, message: String },

    #[error("Malformed checkpoint record {record_key}: {message}")]
    MalformedRecord { record_key: String, message: String },

    #[error("Invalid checkpoint table name: {table}: {reason}")]
    InvalidTableName { table: String, reason: String },
}

impl CheckpointError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error
    pub fn query(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a malformed record error
    pub fn malformed_record(record_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            record_key: record_key.into(),
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for CheckpointError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => CheckpointError::query("database", db_err.to_string()),
            sqlx::Error::ColumnDecode { index, source } => {
                CheckpointError::query("decode", format!("column {index}: {source}"))
            }
            _ => CheckpointError::connection(err.to_string()),
        }
    }
}

/// Failures raised by a [`SearchSource`](crate::search::SearchSource).
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("Search provider rate limited the request: {message}")]
    RateLimited { message: String },

    #[error("Search provider rejected credentials: {message}")]
    Authentication { message: String },

    #[error("Malformed search response: {message}")]
    MalformedResponse { message: String },
}

impl SearchError {
    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::malformed_response(err.to_string())
    }
}

/// Failures raised while submitting a batch to a [`Dispatcher`](crate::dispatch::Dispatcher).
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Downstream target unreachable: {target}: {message}")]
    Unreachable { target: String, message: String },

    #[error("Downstream target rejected submission: {target}: {message}")]
    Rejected { target: String, message: String },

    #[error("Batch serialization error: {message}")]
    Serialization { message: String },

    #[error("Invalid downstream target name: {target}: {reason}")]
    InvalidTarget { target: String, reason: String },
}

impl DispatchError {
    /// Create an unreachable target error
    pub fn unreachable(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unreachable {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a rejected submission error
    pub fn rejected(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::serialization(err.to_string())
    }
}

/// Configuration resolution failures. Always fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    #[error("Invalid configuration value for {field}: {value}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level error for a harvest invocation.
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Search fetch failed: {0}")]
    Search(#[from] SearchError),

    #[error("Batch dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Checkpoint store failed: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Search cursor stalled: page with {item_count} items returned cursor {next} which does not advance past {since}")]
    CursorStalled {
        since: Cursor,
        next: Cursor,
        item_count: usize,
    },

    #[error("Database bootstrap error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, HarvestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_error_from_sqlx() {
        let err: CheckpointError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, CheckpointError::Connection { .. }));

        let err: CheckpointError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, CheckpointError::Connection { .. }));
    }

    #[test]
    fn test_search_error_constructors() {
        let err = SearchError::authentication("bearer token expired");
        assert!(matches!(err, SearchError::Authentication { .. }));
        assert!(err.to_string().contains("bearer token expired"));

        let harvest: HarvestError = SearchError::unavailable("503").into();
        assert!(matches!(harvest, HarvestError::Search(SearchError::Unavailable { .. })));
    }

    #[test]
    fn test_dispatch_error_from_serde() {
        let json_err = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let err: DispatchError = json_err.into();
        assert!(matches!(err, DispatchError::Serialization { .. }));
    }

    #[test]
    fn test_harvest_error_display() {
        let err = HarvestError::from(DispatchError::rejected("tweet_batches", "queue missing"));
        let display = err.to_string();
        assert!(display.contains("Batch dispatch failed"));
        assert!(display.contains("tweet_batches"));
        assert!(display.contains("queue missing"));

        let stalled = HarvestError::CursorStalled {
            since: Cursor::new(10),
            next: Cursor::new(10),
            item_count: 3,
        };
        assert!(stalled.to_string().contains("does not advance past 10"));
    }
}
