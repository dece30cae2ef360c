//! Identifier newtypes.
//!
//! Post and principal identifiers are both store-assigned integers; the
//! newtypes keep them from being mixed up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a post record, assigned by the store at creation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl PostId {
    /// Create a PostId from a raw integer.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw integer.
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostId({})", self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PostId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Identifier of a principal (admin or user).
///
/// Admin and user ids live in separate namespaces; a `PrincipalId` is only
/// meaningful together with a [`crate::Role`] tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub i64);

impl PrincipalId {
    /// Create a PrincipalId from a raw integer.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw integer.
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrincipalId({})", self.0)
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PrincipalId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_id_display() {
        let id = PostId::new(42);
        assert_eq!(format!("{}", id), "42");
        assert_eq!(format!("{:?}", id), "PostId(42)");
    }

    #[test]
    fn test_ids_serialize_transparent() {
        let id = PrincipalId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: PrincipalId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
