//! # Pressroom
//!
//! The unified API for the pressroom backend: role-aware content
//! operations over a shared post resource, with ownership-based access
//! control, scoped queries, and cache-consistent reads.
//!
//! ## Overview
//!
//! Two principal kinds - administrators and regular users - act on posts.
//! Every operation flows through the same pipeline:
//!
//! 1. the **authorization engine** decides allow/deny from a fixed table;
//! 2. list operations are narrowed by the **visibility scoper** before they
//!    reach the store (users see their own records, admins see everything);
//! 3. single-record reads go through the **projection cache**, and every
//!    mutation invalidates the affected entry before completing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pressroom::{ContentService, ServiceConfig};
//! use pressroom::core::{NewPost, Principal};
//! use pressroom::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("pressroom.db").unwrap();
//!     let service = ContentService::new(store, ServiceConfig::default());
//!
//!     let author = Principal::user(1);
//!     let post = service
//!         .create_post(&author, NewPost::new("Hello", "First post"))
//!         .await
//!         .unwrap();
//!
//!     let fetched = service.get_post(&author, post.id).await.unwrap();
//!     assert_eq!(fetched.post.title, "Hello");
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `pressroom::core` - Value types (Post, Principal, etc.)
//! - `pressroom::policy` - Authorization rules and visibility scoping
//! - `pressroom::store` - Storage abstraction, SQLite and in-memory
//! - `pressroom::cache` - The read-through projection cache

pub mod config;
pub mod error;
pub mod service;
pub mod stats;

// Re-export component crates
pub use pressroom_cache as cache;
pub use pressroom_core as core;
pub use pressroom_policy as policy;
pub use pressroom_store as store;

// Re-export main types for convenience
pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use service::ContentService;
pub use stats::DashboardStats;

// Re-export commonly used core types
pub use pressroom_core::{
    AdminAccount, NewAdmin, NewPost, Post, PostId, PostPatch, PostStatus, PostWithAuthor,
    Principal, PrincipalId, Role, UserAccount,
};
