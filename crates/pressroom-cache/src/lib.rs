//! # Pressroom Cache
//!
//! A read-through, single-key-per-record cache with explicit invalidation.
//!
//! The cache is the only shared mutable state inside a pressroom process,
//! so it is internally synchronized and safe to call from any number of
//! concurrent tasks. It is a derived copy of store data, never the source
//! of truth: every mutation path invalidates the affected key before (or as
//! part of) completing.
//!
//! ## Semantics
//!
//! - [`ReadThroughCache::get_or_load`] returns a fresh cached value or runs
//!   the supplied loader and caches its result.
//! - Loader failures propagate to the caller; nothing is cached on error.
//! - Concurrent loads for the same key are not deduplicated; both run and
//!   the last writer wins, which is harmless for values derived from the
//!   same store state.
//! - Entries expire after a fixed TTL and are dropped lazily on access.

pub mod cache;

pub use cache::{ReadThroughCache, DEFAULT_TTL};
