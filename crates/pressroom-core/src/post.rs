//! The post record and its input types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::principal::Role;
use crate::types::{PostId, PrincipalId};

/// Lifecycle status of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    /// Stable string form, used in storage columns.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }

    /// Parse the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The shared content record.
///
/// `author_id` + `author_role` identify exactly one principal, are set at
/// creation time, and never change. `id` is store-assigned and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: PrincipalId,
    pub author_role: Role,
    pub status: PostStatus,
    /// Reference into external blob storage, if an image was attached.
    pub image: Option<String>,
    /// Unix milliseconds, stamped by the store.
    pub created_at: i64,
    /// Unix milliseconds, stamped by the store.
    pub updated_at: i64,
}

impl Post {
    /// Whether the principal with the given id owns this post.
    ///
    /// Ownership compares ids only; a post's owner is allowed to act on it
    /// regardless of which role tag it carries.
    pub fn is_authored_by(&self, id: PrincipalId) -> bool {
        self.author_id == id
    }
}

/// Fields for creating a post.
///
/// Author fields are deliberately absent: they are stamped from the acting
/// principal at the service boundary, never taken from input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status: PostStatus::default(),
            image: None,
        }
    }

    pub fn status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Partial update for a post.
///
/// Like [`NewPost`], carries no author fields; ownership reassignment is
/// not expressible. Unknown fields in an incoming payload are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: Option<PostStatus>,
    #[serde(default)]
    pub image: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.status.is_none()
            && self.image.is_none()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn status(mut self, status: PostStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// The owner of a post, projected for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub id: PrincipalId,
    pub role: Role,
    pub name: String,
}

/// A post joined with its owner projection.
///
/// This is the representation the cache holds. `author` is `None` when the
/// owning account no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Option<AuthorInfo>,
}
