//! Response caching
//!
//! This module provides the TTL cache used to avoid re-fetching pages that were
//! scraped recently. Entries are keyed by a SHA-256 digest of the URL and the
//! selector set used for custom extraction, and expire lazily when read.

mod key;
mod ttl_cache;

pub use key::{cache_key, selector_key};
pub use ttl_cache::{CacheStats, TtlCache};
