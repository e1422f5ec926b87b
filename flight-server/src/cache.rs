//! Caching layer for search responses.
//!
//! The snapshot behind the service is fixed for the process lifetime,
//! so identical canonical queries return identical pages. Interactive
//! use re-issues the same query often (a sort toggled there and back,
//! a page stepped forward and back); a short TTL cache absorbs those
//! round trips. The canonical query itself is the key. Errors are never
//! cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::controller::{SearchBackend, SearchFailed};
use crate::domain::{FlightQuery, SearchResult};

/// Cached result page.
type PageEntry = Arc<SearchResult>;

/// Configuration for the search cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// A search backend with response caching.
///
/// Wraps any [`SearchBackend`] and caches successful pages keyed by the
/// canonical query.
pub struct CachedSearch<B> {
    backend: B,
    pages: MokaCache<FlightQuery, PageEntry>,
}

impl<B: SearchBackend> CachedSearch<B> {
    /// Wrap `backend` with the given cache configuration.
    pub fn new(backend: B, config: &CacheConfig) -> Self {
        let pages = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { backend, pages }
    }

    /// Number of cached pages (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.pages.entry_count()
    }

    /// Drop all cached pages.
    pub fn invalidate_all(&self) {
        self.pages.invalidate_all();
    }
}

#[async_trait]
impl<B: SearchBackend> SearchBackend for CachedSearch<B> {
    async fn search(&self, query: &FlightQuery) -> Result<SearchResult, SearchFailed> {
        if let Some(page) = self.pages.get(query).await {
            return Ok((*page).clone());
        }

        let page = self.backend.search(query).await?;
        self.pages
            .insert(query.clone(), Arc::new(page.clone()))
            .await;
        Ok(page)
    }
}
