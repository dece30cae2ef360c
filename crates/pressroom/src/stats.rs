//! Dashboard statistics: derived, read-only rollups over the record store.

use serde::{Deserialize, Serialize};

use pressroom_core::PostStatus;
use pressroom_store::{Store, StoreError, TopAuthor};

/// The admin dashboard rollup.
///
/// Recomputed on demand; the constituent counts are separate queries with
/// no snapshot between them, so they may reflect slightly different store
/// states under concurrent writes. `total_posts` is the sum of the two
/// status counts, keeping those three mutually consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub published_posts: u64,
    pub draft_posts: u64,
    pub total_posts: u64,
    pub total_users: u64,
    /// Users ranked by authored-post count, descending, at most the
    /// configured limit.
    pub top_authors: Vec<TopAuthor>,
}

/// Compute the rollup from the store's indexed counts.
pub(crate) async fn compute<S: Store>(
    store: &S,
    top_limit: usize,
) -> Result<DashboardStats, StoreError> {
    let published_posts = store.count_posts_by_status(PostStatus::Published).await?;
    let draft_posts = store.count_posts_by_status(PostStatus::Draft).await?;
    let total_users = store.count_users().await?;
    let top_authors = store.top_user_authors(top_limit).await?;

    Ok(DashboardStats {
        published_posts,
        draft_posts,
        total_posts: published_posts + draft_posts,
        total_users,
        top_authors,
    })
}
