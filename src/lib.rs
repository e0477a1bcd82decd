#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow builder methods without must_use when context is clear

//! # Scoped Search
//!
//! Search query builder with composable, reusable query modifications.
//!
//! ## Overview
//!
//! Models declare **global scopes**, applied automatically to every query built
//! for them, and **named scopes**, invoked on demand by name. Applying scopes
//! never mutates the caller's builder: execution works on an independent copy,
//! so a base builder can be reused for several queries. Individual global scopes
//! can be disabled per query, and the builder remembers which ones were removed.
//!
//! ## Module Organization
//!
//! - [`query_builder`] - Builder, scope registry, scope applier, named scopes
//! - [`model`] - Model trait exposing scope tables
//! - [`connection`] - Builder factory, execution path, query reporting
//! - [`cache`] - Optional response caching
//! - [`config`] - Connection configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use scoped_search::model::Model;
//! use scoped_search::query_builder::{GlobalScope, NamedScopes, QueryBuilder};
//! use std::sync::Arc;
//!
//! struct Post {
//!     scopes: NamedScopes,
//! }
//!
//! impl Model for Post {
//!     fn index(&self) -> Option<&str> {
//!         Some("posts")
//!     }
//!
//!     fn named_scopes(&self) -> &NamedScopes {
//!         &self.scopes
//!     }
//!
//!     fn global_scopes(&self) -> Vec<(String, GlobalScope)> {
//!         vec![(
//!             "tenant".to_string(),
//!             GlobalScope::callable(|query| {
//!                 query.where_term("tenant", 42);
//!                 Ok(())
//!             }),
//!         )]
//!     }
//! }
//!
//! let post = Arc::new(Post {
//!     scopes: NamedScopes::new().with("published", |query, _| {
//!         query.where_term("status", "published");
//!         Ok(())
//!     }),
//! });
//!
//! let mut query = QueryBuilder::for_model(&post);
//! query.scopes("published").unwrap();
//!
//! let scoped = query.apply_scopes().unwrap();
//! assert_eq!(scoped.predicates().len(), 2);
//! ```

pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod model;
pub mod query_builder;

pub use config::ConnectionConfig;
pub use connection::{Connection, SearchClient, SearchRequest};
pub use error::{Result, SearchError};
pub use model::Model;
pub use query_builder::{GlobalScope, NamedScopes, QueryBuilder, Scope, ScopeSelector};
