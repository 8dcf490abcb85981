//! Application-level errors

use thiserror::Error;

/// Application errors cover everything around the tree operations:
/// reading input documents, parsing them and loading settings.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tree document: {context}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("node not found: {0}")]
    NodeNotFound(String),
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
