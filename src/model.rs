//! # Model
//!
//! Models own the scope tables a builder resolves against: named scopes looked
//! up by name, and global scopes registered on every builder created for the
//! model.

use crate::error::{Result, SearchError};
use crate::query_builder::{GlobalScope, NamedScopes, QueryBuilder};
use serde_json::Value;

pub trait Model: Send + Sync {
    /// Display name used in errors and logs
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Index the model's documents live in
    fn index(&self) -> Option<&str> {
        None
    }

    fn named_scopes(&self) -> &NamedScopes;

    /// Scopes registered on every builder created for this model, in order
    fn global_scopes(&self) -> Vec<(String, GlobalScope)> {
        Vec::new()
    }

    fn has_named_scope(&self, name: &str) -> bool {
        self.named_scopes().contains(name)
    }

    fn call_named_scope(
        &self,
        builder: &mut QueryBuilder,
        name: &str,
        parameters: &[Value],
    ) -> Result<()> {
        let handler = self
            .named_scopes()
            .get(name)
            .cloned()
            .ok_or_else(|| SearchError::UnknownScopeError {
                model: self.name().to_string(),
                scope: name.to_string(),
            })?;

        handler(builder, parameters)
    }
}
