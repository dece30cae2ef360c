//! # Pressroom Policy
//!
//! The authorization engine and visibility scoper.
//!
//! Both halves are pure functions over [`pressroom_core`] types. Denial is a
//! normal `false` return, never an error; callers decide how to surface it.
//!
//! - [`authorize`] answers "may this principal perform this action on this
//!   target?" from a fixed policy table.
//! - [`scope`] answers "which records may this principal enumerate?" as a
//!   [`Visibility`] value that stores push down into their query layer.
//!
//! The `(resource, action)` pair is a tagged enum match resolved at compile
//! time; there is no runtime policy lookup.

pub mod policy;
pub mod scope;

pub use policy::{authorize, Action, Target};
pub use scope::{scope, Visibility};
