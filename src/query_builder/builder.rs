use super::named::{NamedScopeFn, NamedScopeResolver, ScopeSelector};
use super::scopes::{GlobalScope, Scope, ScopeApplier, ScopeRegistry};
use super::{Condition, Pagination, RangeOperator, SortDirection, SortField};
use crate::connection::Connection;
use crate::error::{Result, SearchError};
use crate::model::Model;
use serde_json::{json, Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::debug;

/// Search query builder with global and named scope support.
///
/// Cloning produces an independent builder: the scope registry, query state
/// and macros are copied by value while the model and connection are shared.
#[derive(Clone, Default)]
pub struct QueryBuilder {
    index: Option<String>,
    filters: Vec<Condition>,
    must_not: Vec<Condition>,
    sort: Vec<SortField>,
    pagination: Option<Pagination>,
    cache_ttl: Option<Duration>,
    registry: ScopeRegistry,
    macros: HashMap<String, NamedScopeFn>,
    model: Option<Weak<dyn Model>>,
    connection: Option<Connection>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder bound to a model: targets its index and carries its global scopes
    pub fn for_model<M: Model + 'static>(model: &Arc<M>) -> Self {
        let weak = Arc::downgrade(model) as Weak<dyn Model>;
        let mut builder = Self {
            index: model.index().map(str::to_string),
            model: Some(weak),
            ..Self::default()
        };

        for (identifier, scope) in model.global_scopes() {
            builder.with_global_scope(identifier, scope);
        }
        builder
    }

    pub(crate) fn bind_connection(&mut self, connection: Connection) {
        if self.index.is_none() {
            self.index = connection.default_index().map(str::to_string);
        }
        self.connection = Some(connection);
    }

    /// Owning model, if bound and still alive
    pub fn model(&self) -> Option<Arc<dyn Model>> {
        self.model.as_ref().and_then(Weak::upgrade)
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    // Query state

    pub fn index(&mut self, index: &str) -> &mut Self {
        self.index = Some(index.to_string());
        self
    }

    pub fn target_index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn where_clause(&mut self, condition: Condition) -> &mut Self {
        self.filters.push(condition);
        self
    }

    pub fn where_term(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.where_clause(Condition::term(field, value))
    }

    pub fn where_terms(&mut self, field: &str, values: Vec<Value>) -> &mut Self {
        self.where_clause(Condition::terms(field, values))
    }

    pub fn where_range(
        &mut self,
        field: &str,
        operator: RangeOperator,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.where_clause(Condition::range(field, operator, value))
    }

    pub fn where_exists(&mut self, field: &str) -> &mut Self {
        self.where_clause(Condition::exists(field))
    }

    pub fn where_missing(&mut self, field: &str) -> &mut Self {
        self.where_clause(Condition::missing(field))
    }

    pub fn where_not(&mut self, condition: Condition) -> &mut Self {
        self.must_not.push(condition);
        self
    }

    pub fn order_by(&mut self, field: &str, direction: SortDirection) -> &mut Self {
        self.sort.push(SortField {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn order_asc(&mut self, field: &str) -> &mut Self {
        self.order_by(field, SortDirection::Asc)
    }

    pub fn order_desc(&mut self, field: &str) -> &mut Self {
        self.order_by(field, SortDirection::Desc)
    }

    pub fn paginate(&mut self, page: u32, per_page: u32) -> &mut Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }

    pub fn limit(&mut self, size: u32) -> &mut Self {
        match self.pagination.as_mut() {
            Some(pagination) => pagination.size = Some(size),
            None => self.pagination = Some(Pagination::size_only(size)),
        }
        self
    }

    pub fn offset(&mut self, from: u32) -> &mut Self {
        match self.pagination.as_mut() {
            Some(pagination) => pagination.from = Some(from),
            None => self.pagination = Some(Pagination::from_only(from)),
        }
        self
    }

    /// Cache the response of this query for `ttl` when the connection has a cache
    pub fn cache_for(&mut self, ttl: Duration) -> &mut Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl
    }

    pub fn predicates(&self) -> &[Condition] {
        &self.filters
    }

    /// Render the accumulated state as a request body
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();

        if !self.filters.is_empty() || !self.must_not.is_empty() {
            let mut bool_query = Map::new();
            if !self.filters.is_empty() {
                bool_query.insert(
                    "filter".to_string(),
                    self.filters.iter().map(Condition::to_dsl).collect(),
                );
            }
            if !self.must_not.is_empty() {
                bool_query.insert(
                    "must_not".to_string(),
                    self.must_not.iter().map(Condition::to_dsl).collect(),
                );
            }
            body.insert("query".to_string(), json!({ "bool": bool_query }));
        }

        if !self.sort.is_empty() {
            body.insert(
                "sort".to_string(),
                self.sort.iter().map(SortField::to_dsl).collect(),
            );
        }

        if let Some(pagination) = &self.pagination {
            pagination.apply_to(&mut body);
        }

        Value::Object(body)
    }

    // Global scopes

    /// Register a global scope. Object scopes get their `extend` hook called immediately.
    pub fn with_global_scope(
        &mut self,
        identifier: impl Into<String>,
        scope: GlobalScope,
    ) -> &mut Self {
        let identifier = identifier.into();
        let extension = match &scope {
            GlobalScope::Object(object) => Some(Arc::clone(object)),
            GlobalScope::Callable(_) => None,
        };

        debug!(scope = %identifier, "Registering global scope");
        self.registry.register(identifier, scope);

        if let Some(object) = extension {
            object.extend(self);
        }
        self
    }

    /// Register an object scope under its own identifier
    pub fn with_scope<S: Scope + 'static>(&mut self, scope: S) -> &mut Self {
        let identifier = scope.identifier().to_string();
        self.with_global_scope(identifier, GlobalScope::object(scope))
    }

    pub fn without_global_scope(&mut self, identifier: &str) -> &mut Self {
        debug!(scope = identifier, "Removing global scope");
        self.registry.remove(identifier);
        self
    }

    /// Remove an object scope by its identifier
    pub fn without_scope(&mut self, scope: &dyn Scope) -> &mut Self {
        self.without_global_scope(scope.identifier())
    }

    /// Remove every scope registered at call time
    pub fn without_global_scopes(&mut self) -> &mut Self {
        self.registry.remove_all(None);
        self
    }

    pub fn without_global_scopes_named<I, S>(&mut self, identifiers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry
            .remove_all(Some(identifiers.into_iter().map(Into::into).collect()));
        self
    }

    pub fn removed_scopes(&self) -> &[String] {
        self.registry.identifiers_removed()
    }

    pub fn registry(&self) -> &ScopeRegistry {
        &self.registry
    }

    /// Builder with every registered global scope applied.
    ///
    /// Called once by the execution path right before the request is built.
    /// `self` is never modified; without registered scopes it is returned as-is.
    pub fn apply_scopes(&self) -> Result<Cow<'_, QueryBuilder>> {
        ScopeApplier::apply(self)
    }

    // Named scopes

    pub fn has_named_scope(&self, name: &str) -> bool {
        self.model()
            .is_some_and(|model| model.has_named_scope(name))
    }

    pub fn call_named_scope(&mut self, name: &str, parameters: &[Value]) -> Result<&mut Self> {
        NamedScopeResolver::call_named(self, name, parameters)?;
        Ok(self)
    }

    /// Apply model scopes by name, sequentially on this builder
    pub fn scopes(&mut self, selector: impl Into<ScopeSelector>) -> Result<&mut Self> {
        NamedScopeResolver::call_selector(self, selector.into())?;
        Ok(self)
    }

    // Macros

    pub fn register_macro<F>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut QueryBuilder, &[Value]) -> Result<()> + Send + Sync + 'static,
    {
        self.macros.insert(name.to_string(), Arc::new(handler));
        self
    }

    pub fn has_macro(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn call_macro(&mut self, name: &str, parameters: &[Value]) -> Result<&mut Self> {
        let handler = self
            .macros
            .get(name)
            .cloned()
            .ok_or_else(|| SearchError::UnknownMacroError(name.to_string()))?;

        handler(self, parameters)?;
        Ok(self)
    }

    // Execution

    /// Execute through the bound connection
    pub async fn get(&self) -> Result<Value> {
        let connection = self.connection.as_ref().ok_or_else(|| {
            SearchError::BindingError("query builder is not bound to a connection".to_string())
        })?;
        connection.execute(self).await
    }
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut macros: Vec<&str> = self.macros.keys().map(String::as_str).collect();
        macros.sort_unstable();

        f.debug_struct("QueryBuilder")
            .field("index", &self.index)
            .field("filters", &self.filters)
            .field("must_not", &self.must_not)
            .field("sort", &self.sort)
            .field("pagination", &self.pagination)
            .field("registry", &self.registry)
            .field("macros", &macros)
            .field("model", &self.model().map(|model| model.name()))
            .field("connection", &self.connection.is_some())
            .finish()
    }
}
