//! # Pressroom Core
//!
//! Pure value types for the pressroom backend: principals, posts, and the
//! input validation applied before anything reaches the store.
//!
//! This crate contains no I/O, no storage, no async. It is plain data and
//! plain checks over that data.
//!
//! ## Key Types
//!
//! - [`Principal`] - Who is acting: a role tag plus an identifier
//! - [`Post`] - The shared content record, owned by exactly one principal
//! - [`PostStatus`] - Draft or Published lifecycle state
//! - [`PostWithAuthor`] - Post joined with its owner projection
//!
//! ## Ownership
//!
//! A post's `author_id` and `author_role` are stamped at creation from the
//! acting principal and never change afterwards. [`PostPatch`] has no author
//! fields, so ownership reassignment cannot even be expressed.

pub mod error;
pub mod post;
pub mod principal;
pub mod types;
pub mod validation;

pub use error::ValidationError;
pub use post::{AuthorInfo, NewPost, Post, PostPatch, PostStatus, PostWithAuthor};
pub use principal::{
    AdminAccount, AdminPatch, NewAdmin, NewUser, Principal, Role, UserAccount,
};
pub use types::{PostId, PrincipalId};
pub use validation::{
    validate_admin_patch, validate_new_admin, validate_new_post, validate_post_patch,
};
