//! # Connection
//!
//! Session object that creates query builders bound to a search client and
//! executes them. The client, cache and reporter are injected and may be shared
//! between connections.

pub mod client;
pub mod reporter;

pub use client::{ClientError, SearchClient, SearchRequest};
pub use reporter::{
    MemoryReporter, QueryEvent, QueryReporter, ReportError, TracingReporter, QUERY_EVENT_CATEGORY,
};

use crate::cache::CacheProvider;
use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::logging::log_query_operation;
use crate::model::Model;
use crate::query_builder::{
    GlobalScope, QueryBuilder, RangeOperator, ScopeApplier, ScopeSelector, SortDirection,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct Connection {
    client: Arc<dyn SearchClient>,
    cache: Option<CacheProvider>,
    reporter: Option<Arc<dyn QueryReporter>>,
    default_index: Option<String>,
    default_cache_ttl: Option<Duration>,
}

impl Connection {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self {
            client,
            cache: None,
            reporter: None,
            default_index: None,
            default_cache_ttl: None,
        }
    }

    pub fn from_config(config: &ConnectionConfig, client: Arc<dyn SearchClient>) -> Result<Self> {
        config.validate()?;

        let mut connection = Self::new(client);
        connection.default_index = config.default_index.clone();
        if config.cache_enabled {
            connection.cache = Some(CacheProvider::moka(config.cache_max_capacity));
            connection.default_cache_ttl = config.cache_ttl();
        }
        if config.report_queries {
            connection.reporter = Some(Arc::new(TracingReporter));
        }

        debug!(
            default_index = connection.default_index.as_deref(),
            cache_enabled = config.cache_enabled,
            report_queries = config.report_queries,
            "Connection created from configuration"
        );
        Ok(connection)
    }

    pub fn with_cache(mut self, cache: CacheProvider) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn QueryReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_default_index(mut self, index: &str) -> Self {
        self.default_index = Some(index.to_string());
        self
    }

    pub fn default_index(&self) -> Option<&str> {
        self.default_index.as_deref()
    }

    pub fn cache(&self) -> Option<&CacheProvider> {
        self.cache.as_ref()
    }

    /// Fresh builder bound to this connection and its default index
    pub fn new_query(&self) -> QueryBuilder {
        let mut query = QueryBuilder::new();
        query.bind_connection(self.clone());
        query
    }

    /// Fresh builder for a model, carrying the model's global scopes
    pub fn query_for<M: Model + 'static>(&self, model: &Arc<M>) -> QueryBuilder {
        let mut query = QueryBuilder::for_model(model);
        query.bind_connection(self.clone());
        query
    }

    // Forwarding to a fresh builder

    pub fn index(&self, index: &str) -> QueryBuilder {
        let mut query = self.new_query();
        query.index(index);
        query
    }

    pub fn where_term(&self, field: &str, value: impl Into<Value>) -> QueryBuilder {
        let mut query = self.new_query();
        query.where_term(field, value);
        query
    }

    pub fn where_terms(&self, field: &str, values: Vec<Value>) -> QueryBuilder {
        let mut query = self.new_query();
        query.where_terms(field, values);
        query
    }

    pub fn where_range(
        &self,
        field: &str,
        operator: RangeOperator,
        value: impl Into<Value>,
    ) -> QueryBuilder {
        let mut query = self.new_query();
        query.where_range(field, operator, value);
        query
    }

    pub fn where_exists(&self, field: &str) -> QueryBuilder {
        let mut query = self.new_query();
        query.where_exists(field);
        query
    }

    pub fn with_global_scope(&self, identifier: &str, scope: GlobalScope) -> QueryBuilder {
        let mut query = self.new_query();
        query.with_global_scope(identifier, scope);
        query
    }

    /// Fails with a binding error: a connection-level builder has no model
    pub fn scopes(&self, selector: impl Into<ScopeSelector>) -> Result<QueryBuilder> {
        let mut query = self.new_query();
        query.scopes(selector)?;
        Ok(query)
    }

    pub fn limit(&self, size: u32) -> QueryBuilder {
        let mut query = self.new_query();
        query.limit(size);
        query
    }

    pub fn order_by(&self, field: &str, direction: SortDirection) -> QueryBuilder {
        let mut query = self.new_query();
        query.order_by(field, direction);
        query
    }

    // Execution

    /// Apply scopes once, report the body, and run the request through the cache and client.
    pub async fn execute(&self, query: &QueryBuilder) -> Result<Value> {
        let (scoped, scopes_applied) = ScopeApplier::apply_with_count(query)?;
        let request = SearchRequest {
            index: scoped
                .target_index()
                .map(str::to_string)
                .or_else(|| self.default_index.clone()),
            body: scoped.to_body(),
        };

        self.report_query(&request);

        let ttl = scoped.cache_ttl().or(self.default_cache_ttl);
        let cache_key = request.cache_key();
        if ttl.is_some() {
            if let Some(cached) = self.cached_response(&cache_key).await {
                log_query_operation(
                    "execute",
                    request.index.as_deref(),
                    scopes_applied,
                    "cache_hit",
                    None,
                );
                return Ok(cached);
            }
        }

        let response = self.client.execute(&request).await.inspect_err(|error| {
            log_query_operation(
                "execute",
                request.index.as_deref(),
                scopes_applied,
                "failed",
                Some(&error.to_string()),
            );
        })?;

        if let Some(ttl) = ttl {
            self.store_response(&cache_key, &response, ttl).await;
        }

        log_query_operation(
            "execute",
            request.index.as_deref(),
            scopes_applied,
            "completed",
            None,
        );
        Ok(response)
    }

    /// Forward the request body to the reporter; failures never reach the caller
    fn report_query(&self, request: &SearchRequest) {
        let Some(reporter) = &self.reporter else {
            return;
        };

        let result = QueryEvent::from_request(request).and_then(|event| reporter.report(&event));
        if let Err(error) = result {
            warn!(%error, "Query reporting failed - continuing");
        }
    }

    async fn cached_response(&self, key: &str) -> Option<Value> {
        let cache = self.cache.as_ref()?;
        match cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(error) => {
                    warn!(key = key, %error, "Discarding unreadable cached response");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(key = key, %error, "Cache read failed - treating as miss");
                None
            }
        }
    }

    async fn store_response(&self, key: &str, response: &Value, ttl: Duration) {
        let Some(cache) = &self.cache else {
            return;
        };

        let raw = match serde_json::to_string(response) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(key = key, %error, "Response not cacheable");
                return;
            }
        };

        if let Err(error) = cache.set(key, &raw, ttl).await {
            warn!(key = key, %error, "Cache write failed");
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("client", &"SearchClient")
            .field("cache", &self.cache.as_ref().map(CacheProvider::provider_name))
            .field("reporter", &self.reporter.is_some())
            .field("default_index", &self.default_index)
            .field("default_cache_ttl", &self.default_cache_ttl)
            .finish()
    }
}
