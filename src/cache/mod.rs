//! # Query Cache Module
//!
//! Optional response caching for executed queries.
//!
//! ```text
//! CacheProvider (enum)            <- Enum dispatch, no vtable
//!   ├── Moka(MokaCacheService)      <- In-process, bounded, per-entry TTL
//!   └── NoOp(NoOpCacheService)      <- Always-miss, always-succeed
//! ```
//!
//! Cache errors are logged by the connection and treated as misses; they never
//! fail a query.

pub mod errors;
pub mod provider;
pub mod providers;
pub mod traits;

pub use errors::{CacheError, CacheResult};
pub use provider::CacheProvider;
pub use providers::{MokaCacheService, NoOpCacheService};
pub use traits::CacheService;
