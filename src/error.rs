//! Error types for the search query layer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("Unknown scope '{scope}' on model {model}")]
    UnknownScopeError { model: String, scope: String },
    #[error("Unknown macro: {0}")]
    UnknownMacroError(String),
    #[error("Binding error: {0}")]
    BindingError(String),
    #[error("Scope error: {0}")]
    ScopeError(String),
    #[error("Client error: {0}")]
    ClientError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<serde_json::Error> for SearchError {
    fn from(error: serde_json::Error) -> Self {
        SearchError::SerializationError(format!("JSON serialization error: {error}"))
    }
}

impl From<crate::connection::ClientError> for SearchError {
    fn from(error: crate::connection::ClientError) -> Self {
        SearchError::ClientError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
