//! Query visibility scoping.
//!
//! `scope` turns a principal into a [`Visibility`] value that stores push
//! down into their query layer. Scoping happens at the query boundary, never
//! by filtering an already-fetched result set: the record set is unbounded.

use serde::{Deserialize, Serialize};

use pressroom_core::{Post, Principal, PrincipalId};

/// Which records a principal may enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Unrestricted: every record is visible.
    All,
    /// Only records whose author id matches.
    OwnedBy(PrincipalId),
}

impl Visibility {
    /// Whether a post falls inside this scope.
    ///
    /// Used by the in-memory store and by tests; SQL backends translate the
    /// scope into a WHERE clause instead.
    pub fn allows(&self, post: &Post) -> bool {
        match self {
            Visibility::All => true,
            Visibility::OwnedBy(id) => post.author_id == *id,
        }
    }
}

/// The visibility scope for a principal: admins see everything, users see
/// only their own records.
pub fn scope(principal: &Principal) -> Visibility {
    if principal.is_admin() {
        Visibility::All
    } else {
        Visibility::OwnedBy(principal.id)
    }
}
