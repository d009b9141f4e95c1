use thiserror::Error;

/// Internal error type for store operations.
///
/// Separates infrastructure failures (database, blob storage, parsing)
/// from domain failures (item not found). This type is NOT exposed over
/// HTTP; the API layer converts it explicitly (see `errors::api`).
#[derive(Error, Debug)]
pub enum InternalError {
    /// Database query or mutation failed
    #[error("database error: {operation} failed: {source}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Blob store read/write/delete failed
    #[error("blob store error: {operation} failed: {source}")]
    Blob {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// A stored value could not be interpreted (status string, timestamp)
    #[error("parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    /// Item-domain errors
    #[error(transparent)]
    Item(#[from] ItemError),
}

impl InternalError {
    pub fn database(operation: impl Into<String>, source: sea_orm::DbErr) -> Self {
        Self::Database {
            operation: operation.into(),
            source,
        }
    }

    pub fn blob(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Blob {
            operation: operation.into(),
            source,
        }
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }
}

/// Domain errors raised by the item store.
#[derive(Error, Debug)]
pub enum ItemError {
    /// No record with this id. Also what the loser of a delete/update race
    /// observes; it must reach the caller rather than being swallowed.
    #[error("item not found: {0}")]
    NotFound(String),
}

/// Email dispatch failure. Never fatal to the reservation that triggered
/// it, which is why it lives outside [`InternalError`].
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("notification transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notification endpoint rejected the request: status {status}: {body}")]
    Rejected { status: u16, body: String },
}
