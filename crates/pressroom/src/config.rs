//! Configuration for the service layer.

use std::time::Duration;

use pressroom_cache::DEFAULT_TTL;
use pressroom_store::DEFAULT_PAGE_SIZE;

/// Configuration for [`crate::ContentService`].
///
/// Constructed once by the embedding process and passed in explicitly;
/// there is no global configuration lookup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Time-to-live for cached post projections.
    pub cache_ttl: Duration,
    /// Page size used when a list call does not specify one.
    pub default_page_size: u32,
    /// Maximum entries in the dashboard's top-author ranking.
    pub top_authors_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            default_page_size: DEFAULT_PAGE_SIZE,
            top_authors_limit: 5,
        }
    }
}
