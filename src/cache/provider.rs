use super::errors::CacheResult;
use super::providers::{MokaCacheService, NoOpCacheService};
use super::traits::CacheService;
use std::time::Duration;

/// Cache provider using enum dispatch over the available backends
#[derive(Debug, Clone)]
pub enum CacheProvider {
    Moka(MokaCacheService),
    NoOp(NoOpCacheService),
}

impl CacheProvider {
    pub fn moka(max_capacity: u64) -> Self {
        Self::Moka(MokaCacheService::new(max_capacity))
    }

    pub fn noop() -> Self {
        Self::NoOp(NoOpCacheService::new())
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::NoOp(_))
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Moka(s) => s.provider_name(),
            Self::NoOp(s) => s.provider_name(),
        }
    }

    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            Self::Moka(s) => s.get(key).await,
            Self::NoOp(s) => s.get(key).await,
        }
    }

    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        match self {
            Self::Moka(s) => s.set(key, value, ttl).await,
            Self::NoOp(s) => s.set(key, value, ttl).await,
        }
    }

    pub async fn has(&self, key: &str) -> CacheResult<bool> {
        match self {
            Self::Moka(s) => s.has(key).await,
            Self::NoOp(s) => s.has(key).await,
        }
    }

    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        match self {
            Self::Moka(s) => s.delete(key).await,
            Self::NoOp(s) => s.delete(key).await,
        }
    }
}
