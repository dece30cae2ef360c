//! Store trait: the abstract interface for record persistence.
//!
//! This trait lets the service layer be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pressroom_core::{
    AdminAccount, AdminPatch, NewAdmin, NewPost, NewUser, Post, PostId, PostPatch, PostStatus,
    PostWithAuthor, Principal, PrincipalId, UserAccount,
};
use pressroom_policy::Visibility;

use crate::error::Result;

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of results plus total-count metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matching records across all pages.
    pub total: u64,
    /// 1-based page number this page was cut from.
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Number of pages needed for all records at this page size.
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page as u64)
    }
}

/// A scoped, searchable, paginated post query.
///
/// The visibility scope is part of the query so stores can push it down to
/// their index layer; callers never receive records outside it.
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub visibility: Visibility,
    /// Optional free-text match over title and content.
    pub search: Option<String>,
    /// 1-based page number; zero is treated as the first page.
    pub page: u32,
    pub per_page: u32,
}

impl PostQuery {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            search: None,
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Offset of the first record on this page.
    pub fn offset(&self) -> u64 {
        let page = self.page.max(1) as u64;
        (page - 1) * self.per_page as u64
    }
}

/// A user together with how many posts they have authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopAuthor {
    pub user_id: PrincipalId,
    pub name: String,
    pub post_count: u64,
}

/// The Store trait: async interface for record persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the
/// runtime.
///
/// # Design Notes
///
/// - **Scoped queries**: [`find_posts`](Store::find_posts) applies the
///   visibility scope at the query layer, backed by the author index.
/// - **Atomic updates**: `update_post` is a single read-modify-write; two
///   concurrent updates to the same id never lose each other's writes.
/// - **Store-assigned ids and timestamps**: callers never pick either.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Post Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a post, stamping author fields from `author` and timestamps
    /// from the store clock.
    async fn insert_post(&self, author: &Principal, input: &NewPost) -> Result<Post>;

    /// Get a post by id.
    async fn get_post(&self, id: PostId) -> Result<Option<Post>>;

    /// Get a post joined with its owner projection.
    ///
    /// The owner is resolved through the account table matching the post's
    /// role tag; `author` is `None` when that account no longer exists.
    async fn get_post_with_author(&self, id: PostId) -> Result<Option<PostWithAuthor>>;

    /// Find posts matching a scoped query, newest first.
    async fn find_posts(&self, query: &PostQuery) -> Result<Page<Post>>;

    /// Apply a patch to a post, bumping `updated_at`.
    ///
    /// Returns the updated record, or `None` if the id is unknown. Author
    /// fields are untouched by construction.
    async fn update_post(&self, id: PostId, patch: &PostPatch) -> Result<Option<Post>>;

    /// Delete a post. Returns whether a record was removed.
    async fn delete_post(&self, id: PostId) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Admin Account Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert an admin account. Fails with [`crate::StoreError::EmailTaken`]
    /// on a duplicate email.
    async fn insert_admin(&self, input: &NewAdmin) -> Result<AdminAccount>;

    /// Get an admin account by id.
    async fn get_admin(&self, id: PrincipalId) -> Result<Option<AdminAccount>>;

    /// List admin accounts, oldest first.
    async fn list_admins(&self, page: u32, per_page: u32) -> Result<Page<AdminAccount>>;

    /// Apply a patch to an admin account, bumping `updated_at`.
    async fn update_admin(
        &self,
        id: PrincipalId,
        patch: &AdminPatch,
    ) -> Result<Option<AdminAccount>>;

    /// Delete an admin account. Returns whether a record was removed.
    async fn delete_admin(&self, id: PrincipalId) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // User Account Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a user account. Fails with [`crate::StoreError::EmailTaken`]
    /// on a duplicate email.
    async fn insert_user(&self, input: &NewUser) -> Result<UserAccount>;

    /// Get a user account by id.
    async fn get_user(&self, id: PrincipalId) -> Result<Option<UserAccount>>;

    /// Total number of user accounts.
    async fn count_users(&self) -> Result<u64>;

    // ─────────────────────────────────────────────────────────────────────────
    // Stats Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Number of posts with the given status, backed by the status index.
    async fn count_posts_by_status(&self, status: PostStatus) -> Result<u64>;

    /// Users ranked by number of authored posts, descending, at most
    /// `limit` entries. Ties break on ascending user id.
    async fn top_user_authors(&self, limit: usize) -> Result<Vec<TopAuthor>>;
}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_total_pages() {
        let page: Page<u8> = Page {
            items: vec![],
            total: 21,
            page: 1,
            per_page: 10,
        };
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_query_offset() {
        let q = PostQuery::new(Visibility::All).page(3).per_page(10);
        assert_eq!(q.offset(), 20);

        // Page zero behaves as the first page.
        let q = PostQuery::new(Visibility::All).page(0);
        assert_eq!(q.offset(), 0);
    }
}
