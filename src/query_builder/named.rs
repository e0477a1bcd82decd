//! Named (local) scopes resolved through the model's registration table.

use super::QueryBuilder;
use crate::error::{Result, SearchError};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Handler invoked for a named scope or builder macro: the builder plus positional parameters
pub type NamedScopeFn = Arc<dyn Fn(&mut QueryBuilder, &[Value]) -> Result<()> + Send + Sync>;

/// Explicit name → handler table a model exposes its local scopes through
#[derive(Clone, Default)]
pub struct NamedScopes {
    handlers: HashMap<String, NamedScopeFn>,
}

impl NamedScopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, chaining style
    pub fn with<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&mut QueryBuilder, &[Value]) -> Result<()> + Send + Sync + 'static,
    {
        self.insert(name, handler);
        self
    }

    pub fn insert<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&mut QueryBuilder, &[Value]) -> Result<()> + Send + Sync + 'static,
    {
        self.handlers.insert(name.to_string(), Arc::new(handler));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&NamedScopeFn> {
        self.handlers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for NamedScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedScopes")
            .field("names", &self.names())
            .finish()
    }
}

/// Which named scopes to invoke and with what parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeSelector {
    Name(String),
    Names(Vec<String>),
    WithParameters(Vec<(String, Vec<Value>)>),
}

impl ScopeSelector {
    /// Entries in caller order; bare names get an empty parameter list
    pub fn into_entries(self) -> Vec<(String, Vec<Value>)> {
        match self {
            ScopeSelector::Name(name) => vec![(name, Vec::new())],
            ScopeSelector::Names(names) => names.into_iter().map(|n| (n, Vec::new())).collect(),
            ScopeSelector::WithParameters(entries) => entries,
        }
    }
}

impl From<&str> for ScopeSelector {
    fn from(name: &str) -> Self {
        ScopeSelector::Name(name.to_string())
    }
}

impl From<String> for ScopeSelector {
    fn from(name: String) -> Self {
        ScopeSelector::Name(name)
    }
}

impl From<Vec<&str>> for ScopeSelector {
    fn from(names: Vec<&str>) -> Self {
        ScopeSelector::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for ScopeSelector {
    fn from(names: Vec<String>) -> Self {
        ScopeSelector::Names(names)
    }
}

impl<const N: usize> From<[&str; N]> for ScopeSelector {
    fn from(names: [&str; N]) -> Self {
        ScopeSelector::Names(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Vec<(&str, Vec<Value>)>> for ScopeSelector {
    fn from(entries: Vec<(&str, Vec<Value>)>) -> Self {
        ScopeSelector::WithParameters(
            entries
                .into_iter()
                .map(|(name, parameters)| (name.to_string(), parameters))
                .collect(),
        )
    }
}

impl From<Vec<(String, Vec<Value>)>> for ScopeSelector {
    fn from(entries: Vec<(String, Vec<Value>)>) -> Self {
        ScopeSelector::WithParameters(entries)
    }
}

/// Looks up named scopes on the builder's model and runs them in place
pub struct NamedScopeResolver;

impl NamedScopeResolver {
    pub fn call_named(builder: &mut QueryBuilder, name: &str, parameters: &[Value]) -> Result<()> {
        let model = builder.model().ok_or_else(|| {
            SearchError::BindingError(format!(
                "named scope '{name}' requires a builder bound to a model"
            ))
        })?;

        debug!(model = model.name(), scope = name, "Calling named scope");
        model.call_named_scope(builder, name, parameters)
    }

    /// Run every selected scope sequentially against the same builder
    pub fn call_selector(builder: &mut QueryBuilder, selector: ScopeSelector) -> Result<()> {
        for (name, parameters) in selector.into_entries() {
            Self::call_named(builder, &name, &parameters)?;
        }
        Ok(())
    }
}
