//! Global scope storage and application.
//!
//! A [`ScopeRegistry`] is owned by exactly one [`QueryBuilder`] and is cloned by
//! value with it. [`ScopeApplier`] walks the registry of a builder and runs every
//! surviving scope against an independent copy, leaving the caller's builder
//! untouched.

use super::QueryBuilder;
use crate::error::Result;
use crate::model::Model;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Callable scope body
pub type ScopeFn = Arc<dyn Fn(&mut QueryBuilder) -> Result<()> + Send + Sync>;

/// Object scope: a reusable query modification with a stable identifier.
pub trait Scope: Send + Sync {
    /// Identifier the scope is registered and removed under.
    fn identifier(&self) -> &str;

    /// Modify the builder. The owning model is passed when the builder is bound to one.
    fn apply(&self, builder: &mut QueryBuilder, model: Option<&dyn Model>) -> Result<()>;

    /// Invoked once when the scope is registered on a builder.
    fn extend(&self, _builder: &mut QueryBuilder) {}
}

/// A scope registered on a builder, either a closure or a [`Scope`] object
#[derive(Clone)]
pub enum GlobalScope {
    Callable(ScopeFn),
    Object(Arc<dyn Scope>),
}

impl GlobalScope {
    pub fn callable<F>(scope: F) -> Self
    where
        F: Fn(&mut QueryBuilder) -> Result<()> + Send + Sync + 'static,
    {
        GlobalScope::Callable(Arc::new(scope))
    }

    pub fn object<S: Scope + 'static>(scope: S) -> Self {
        GlobalScope::Object(Arc::new(scope))
    }

    pub(crate) fn invoke(&self, builder: &mut QueryBuilder) -> Result<()> {
        match self {
            GlobalScope::Callable(scope) => scope(builder),
            GlobalScope::Object(scope) => {
                let model = builder.model();
                scope.apply(builder, model.as_deref())
            }
        }
    }
}

impl fmt::Debug for GlobalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalScope::Callable(_) => f.write_str("Callable"),
            GlobalScope::Object(scope) => write!(f, "Object({})", scope.identifier()),
        }
    }
}

/// Identifier → scope mapping in registration order, plus a log of removals
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    scopes: Vec<(String, GlobalScope)>,
    removed_scopes: Vec<String>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a scope, overwriting in place if the identifier is already registered.
    pub fn register(&mut self, identifier: impl Into<String>, scope: GlobalScope) {
        let identifier = identifier.into();
        match self.position(&identifier) {
            Some(index) => self.scopes[index].1 = scope,
            None => self.scopes.push((identifier, scope)),
        }
    }

    /// Drop a scope if present and record the identifier in the removal log.
    pub fn remove(&mut self, identifier: &str) {
        if let Some(index) = self.position(identifier) {
            self.scopes.remove(index);
        }
        self.removed_scopes.push(identifier.to_string());
    }

    /// Remove the given identifiers, or every identifier registered right now.
    pub fn remove_all(&mut self, identifiers: Option<Vec<String>>) {
        let identifiers = identifiers.unwrap_or_else(|| {
            self.scopes
                .iter()
                .map(|(identifier, _)| identifier.clone())
                .collect()
        });

        for identifier in identifiers {
            self.remove(&identifier);
        }
    }

    pub fn identifiers_removed(&self) -> &[String] {
        &self.removed_scopes
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.position(identifier).is_some()
    }

    pub fn get(&self, identifier: &str) -> Option<&GlobalScope> {
        self.position(identifier).map(|index| &self.scopes[index].1)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(|(identifier, _)| identifier.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GlobalScope)> {
        self.scopes
            .iter()
            .map(|(identifier, scope)| (identifier.as_str(), scope))
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    fn position(&self, identifier: &str) -> Option<usize> {
        self.scopes.iter().position(|(id, _)| id == identifier)
    }
}

/// Runs a builder's global scopes against a copy of it
pub struct ScopeApplier;

impl ScopeApplier {
    /// Apply every registered scope in registration order.
    ///
    /// Returns the input untouched (borrowed) when nothing is registered. Otherwise
    /// the scopes run against a clone; a scope removed by an earlier scope during
    /// the same pass is skipped. Errors from a scope body propagate as-is and the
    /// partially scoped clone is dropped.
    pub fn apply(builder: &QueryBuilder) -> Result<Cow<'_, QueryBuilder>> {
        Self::apply_with_count(builder).map(|(result, _)| result)
    }

    /// Same as [`ScopeApplier::apply`], also returning how many scopes were invoked.
    pub fn apply_with_count(builder: &QueryBuilder) -> Result<(Cow<'_, QueryBuilder>, usize)> {
        if builder.registry().is_empty() {
            return Ok((Cow::Borrowed(builder), 0));
        }

        let mut result = builder.clone();
        let mut invoked = 0;
        for (identifier, scope) in builder.registry().iter() {
            if !result.registry().contains(identifier) {
                debug!(scope = identifier, "Skipping scope removed during application");
                continue;
            }

            debug!(scope = identifier, "Applying global scope");
            scope.invoke(&mut result)?;
            invoked += 1;
        }

        Ok((Cow::Owned(result), invoked))
    }
}
