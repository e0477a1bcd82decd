//! # Query Builder System
//!
//! Search query building with composable scopes.
//!
//! ## Overview
//!
//! A [`QueryBuilder`] accumulates filter state for a search request and carries
//! two kinds of reusable query modifications:
//!
//! - **Global scopes** registered on the builder (usually by its model) and applied
//!   automatically, in registration order, when the query is executed. Individual
//!   scopes can be switched off per query with `without_global_scope`.
//! - **Named scopes** defined in a model's [`NamedScopes`] table and invoked on demand
//!   with [`QueryBuilder::scopes`].
//!
//! ## Key Components
//!
//! - [`builder`] - The builder and its scope API
//! - [`conditions`] - Filter predicates and their query DSL rendering
//! - [`pagination`] - `size`/`from` handling
//! - [`scopes`] - Scope registry and the applier
//! - [`named`] - Named scope table and resolver
//! - [`soft_deletes`] - Object scope hiding soft-deleted documents
//!
//! ## Usage
//!
//! ```rust
//! use scoped_search::query_builder::{GlobalScope, QueryBuilder};
//!
//! let mut base = QueryBuilder::new();
//! base.with_global_scope("tenant", GlobalScope::callable(|query| {
//!     query.where_term("tenant", 42);
//!     Ok(())
//! }));
//!
//! let scoped = base.apply_scopes().unwrap();
//! assert_eq!(scoped.predicates().len(), 1);
//! assert!(base.predicates().is_empty());
//! ```

pub mod builder;
pub mod conditions;
pub mod named;
pub mod pagination;
pub mod scopes;
pub mod soft_deletes;

pub use builder::QueryBuilder;
pub use conditions::{Condition, RangeOperator, SortDirection, SortField};
pub use named::{NamedScopeFn, NamedScopeResolver, NamedScopes, ScopeSelector};
pub use pagination::Pagination;
pub use scopes::{GlobalScope, Scope, ScopeApplier, ScopeFn, ScopeRegistry};
pub use soft_deletes::SoftDeletingScope;
