use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Fully scoped request handed to the search cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub index: Option<String>,
    pub body: Value,
}

impl SearchRequest {
    /// Key for response caching: target index plus the full serialized body
    pub fn cache_key(&self) -> String {
        format!(
            "search:{}:{}",
            self.index.as_deref().unwrap_or("_all"),
            self.body
        )
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Cluster rejected query ({status}): {reason}")]
    Rejected { status: u16, reason: String },
}

/// Wire client executing requests against a search cluster
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn execute(&self, request: &SearchRequest) -> Result<Value, ClientError>;
}
