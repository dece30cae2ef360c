//! # Pressroom Store
//!
//! Record persistence for pressroom. Provides a trait-based interface with
//! SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts record storage behind the [`Store`] trait,
//! letting the service layer be storage-agnostic. The primary implementation
//! is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all persistence operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`PostQuery`] - A scoped, searchable, paginated post query
//! - [`Page`] - One page of results plus total-count metadata
//!
//! ## Design Notes
//!
//! - **Scoping at the query boundary**: [`PostQuery`] carries a
//!   [`pressroom_policy::Visibility`] that implementations translate into
//!   indexed filters; callers never post-filter a full fetch.
//! - **Atomic updates**: `update_post` is a read-modify-write inside one
//!   critical section, so concurrent updates to the same id never lose
//!   writes.
//! - **Store-owned ids and clocks**: record ids and timestamps are assigned
//!   here, never by callers.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Page, PostQuery, Store, TopAuthor, DEFAULT_PAGE_SIZE};
