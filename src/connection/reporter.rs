//! Best-effort reporting of outgoing query bodies.

use super::client::SearchRequest;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

pub const QUERY_EVENT_CATEGORY: &str = "search.query";

/// Event handed to a reporter for each executed query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryEvent {
    pub category: &'static str,
    pub index: Option<String>,
    /// Serialized request body
    pub data: String,
    pub reported_at: DateTime<Utc>,
}

impl QueryEvent {
    pub fn from_request(request: &SearchRequest) -> Result<Self, ReportError> {
        let data = serde_json::to_string(&request.body)
            .map_err(|e| ReportError::Serialization(e.to_string()))?;

        Ok(Self {
            category: QUERY_EVENT_CATEGORY,
            index: request.index.clone(),
            data,
            reported_at: Utc::now(),
        })
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report serialization error: {0}")]
    Serialization(String),
    #[error("Report sink unavailable: {0}")]
    Unavailable(String),
}

/// Observability side channel for outgoing queries
pub trait QueryReporter: Send + Sync {
    fn report(&self, event: &QueryEvent) -> Result<(), ReportError>;
}

/// Reports queries as `tracing` events
#[derive(Debug, Clone, Default)]
pub struct TracingReporter;

impl QueryReporter for TracingReporter {
    fn report(&self, event: &QueryEvent) -> Result<(), ReportError> {
        tracing::info!(
            category = event.category,
            index = event.index.as_deref(),
            data = %event.data,
            reported_at = %event.reported_at.to_rfc3339(),
            "📤 SEARCH_QUERY"
        );
        Ok(())
    }
}

/// Keeps reported events in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter {
    events: Arc<Mutex<Vec<QueryEvent>>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<QueryEvent> {
        self.events.lock().clone()
    }
}

impl QueryReporter for MemoryReporter {
    fn report(&self, event: &QueryEvent) -> Result<(), ReportError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
