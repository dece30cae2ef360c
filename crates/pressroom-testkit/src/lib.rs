//! # Pressroom Testkit
//!
//! Shared fixtures for pressroom test suites: canned principals, unique
//! account inputs, and pre-seeded in-memory stores.
//!
//! Everything here is test support; nothing is meant for production use.

pub mod fixtures;

pub use fixtures::{
    draft_post, new_admin, new_user, published_post, seeded_store, unique_email, SeededStore,
};
