//! End-to-end post operations: ownership, scoping, and cache consistency.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use pressroom::core::{
    AdminAccount, AdminPatch, NewAdmin, NewPost, NewUser, Post, PostId, PostPatch, PostStatus,
    PostWithAuthor, Principal, PrincipalId, UserAccount,
};
use pressroom::store::{MemoryStore, Page, PostQuery, Store, TopAuthor};
use pressroom::{ContentService, ServiceConfig};
use pressroom_testkit::{draft_post, published_post, seeded_store, SeededStore};

/// Store wrapper that counts projection loads, to observe cache behavior
/// from outside the service.
struct CountingStore {
    inner: MemoryStore,
    projection_loads: Arc<AtomicUsize>,
}

#[async_trait]
impl Store for CountingStore {
    async fn insert_post(
        &self,
        author: &Principal,
        input: &NewPost,
    ) -> pressroom::store::Result<Post> {
        self.inner.insert_post(author, input).await
    }

    async fn get_post(&self, id: PostId) -> pressroom::store::Result<Option<Post>> {
        self.inner.get_post(id).await
    }

    async fn get_post_with_author(
        &self,
        id: PostId,
    ) -> pressroom::store::Result<Option<PostWithAuthor>> {
        self.projection_loads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_post_with_author(id).await
    }

    async fn find_posts(&self, query: &PostQuery) -> pressroom::store::Result<Page<Post>> {
        self.inner.find_posts(query).await
    }

    async fn update_post(
        &self,
        id: PostId,
        patch: &PostPatch,
    ) -> pressroom::store::Result<Option<Post>> {
        self.inner.update_post(id, patch).await
    }

    async fn delete_post(&self, id: PostId) -> pressroom::store::Result<bool> {
        self.inner.delete_post(id).await
    }

    async fn insert_admin(&self, input: &NewAdmin) -> pressroom::store::Result<AdminAccount> {
        self.inner.insert_admin(input).await
    }

    async fn get_admin(
        &self,
        id: PrincipalId,
    ) -> pressroom::store::Result<Option<AdminAccount>> {
        self.inner.get_admin(id).await
    }

    async fn list_admins(
        &self,
        page: u32,
        per_page: u32,
    ) -> pressroom::store::Result<Page<AdminAccount>> {
        self.inner.list_admins(page, per_page).await
    }

    async fn update_admin(
        &self,
        id: PrincipalId,
        patch: &AdminPatch,
    ) -> pressroom::store::Result<Option<AdminAccount>> {
        self.inner.update_admin(id, patch).await
    }

    async fn delete_admin(&self, id: PrincipalId) -> pressroom::store::Result<bool> {
        self.inner.delete_admin(id).await
    }

    async fn insert_user(&self, input: &NewUser) -> pressroom::store::Result<UserAccount> {
        self.inner.insert_user(input).await
    }

    async fn get_user(&self, id: PrincipalId) -> pressroom::store::Result<Option<UserAccount>> {
        self.inner.get_user(id).await
    }

    async fn count_users(&self) -> pressroom::store::Result<u64> {
        self.inner.count_users().await
    }

    async fn count_posts_by_status(&self, status: PostStatus) -> pressroom::store::Result<u64> {
        self.inner.count_posts_by_status(status).await
    }

    async fn top_user_authors(&self, limit: usize) -> pressroom::store::Result<Vec<TopAuthor>> {
        self.inner.top_user_authors(limit).await
    }
}

fn service_over(seeded: SeededStore) -> ContentService<MemoryStore> {
    ContentService::new(seeded.store, ServiceConfig::default())
}

async fn counting_service() -> (ContentService<CountingStore>, Arc<AtomicUsize>, Principal) {
    let seeded = seeded_store().await;
    let admin = seeded.admin_principal();
    let loads = Arc::new(AtomicUsize::new(0));
    let counting = CountingStore {
        inner: seeded.store,
        projection_loads: Arc::clone(&loads),
    };
    (
        ContentService::new(counting, ServiceConfig::default()),
        loads,
        admin,
    )
}

#[tokio::test]
async fn create_stamps_owner_from_principal() {
    let seeded = seeded_store().await;
    let alice = seeded.alice_principal();
    let service = service_over(seeded);

    let post = service
        .create_post(&alice, NewPost::new("T", "C"))
        .await
        .unwrap();

    assert_eq!(post.author_id, alice.id);
    assert_eq!(post.author_role, alice.role);
    assert_eq!(post.status, PostStatus::Draft);
}

#[tokio::test]
async fn foreign_user_gets_forbidden_admin_gets_post() {
    let seeded = seeded_store().await;
    let alice = seeded.alice_principal();
    let bob = seeded.bob_principal();
    let admin = seeded.admin_principal();
    let service = service_over(seeded);

    let post = service
        .create_post(&alice, draft_post("Alice's"))
        .await
        .unwrap();

    // A non-owner probing a real id gets Forbidden, not NotFound.
    let err = service.get_post(&bob, post.id).await.unwrap_err();
    assert!(err.is_forbidden());

    // An absent id gets NotFound; the two outcomes stay distinguishable.
    let err = service.get_post(&bob, PostId::new(9999)).await.unwrap_err();
    assert!(err.is_not_found());

    let fetched = service.get_post(&admin, post.id).await.unwrap();
    assert_eq!(fetched.post.id, post.id);
    assert_eq!(fetched.author.unwrap().name, "alice");
}

#[tokio::test]
async fn owner_can_update_and_delete() {
    let seeded = seeded_store().await;
    let alice = seeded.alice_principal();
    let service = service_over(seeded);

    let post = service
        .create_post(&alice, draft_post("Mine"))
        .await
        .unwrap();

    let updated = service
        .update_post(&alice, post.id, PostPatch::default().title("Still mine"))
        .await
        .unwrap();
    assert_eq!(updated.post.title, "Still mine");

    service.delete_post(&alice, post.id).await.unwrap();
    let err = service.get_post(&alice, post.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn non_owner_cannot_update_or_delete() {
    let seeded = seeded_store().await;
    let alice = seeded.alice_principal();
    let bob = seeded.bob_principal();
    let service = service_over(seeded);

    let post = service
        .create_post(&alice, draft_post("Mine"))
        .await
        .unwrap();

    let err = service
        .update_post(&bob, post.id, PostPatch::default().title("Taken"))
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    let err = service.delete_post(&bob, post.id).await.unwrap_err();
    assert!(err.is_forbidden());

    // The record is untouched.
    let fetched = service.get_post(&alice, post.id).await.unwrap();
    assert_eq!(fetched.post.title, "Mine");
}

#[tokio::test]
async fn update_never_changes_author() {
    let seeded = seeded_store().await;
    let alice = seeded.alice_principal();
    let admin = seeded.admin_principal();
    let service = service_over(seeded);

    let post = service
        .create_post(&alice, draft_post("Owned"))
        .await
        .unwrap();

    // Even an admin applying a patch leaves ownership untouched; a patch
    // cannot carry author fields at all.
    let patch: PostPatch =
        serde_json::from_str(r#"{"title":"Edited","author_id":42,"author_role":"admin"}"#)
            .unwrap();
    let updated = service.update_post(&admin, post.id, patch).await.unwrap();

    assert_eq!(updated.post.title, "Edited");
    assert_eq!(updated.post.author_id, alice.id);
    assert_eq!(updated.post.author_role, alice.role);
}

#[tokio::test]
async fn listing_is_scoped_per_principal() {
    let seeded = seeded_store().await;
    let alice = seeded.alice_principal();
    let bob = seeded.bob_principal();
    let admin = seeded.admin_principal();
    let service = service_over(seeded);

    for i in 0..3 {
        service
            .create_post(&alice, draft_post(&format!("alice {}", i)))
            .await
            .unwrap();
    }
    service.create_post(&bob, draft_post("bob 0")).await.unwrap();

    let alices = service.list_posts(&alice, None, 1, None).await.unwrap();
    assert_eq!(alices.total, 3);
    assert!(alices.items.iter().all(|p| p.author_id == alice.id));

    let bobs = service.list_posts(&bob, None, 1, None).await.unwrap();
    assert_eq!(bobs.total, 1);

    let all = service.list_posts(&admin, None, 1, None).await.unwrap();
    assert_eq!(all.total, 4);
}

#[tokio::test]
async fn listing_searches_within_scope() {
    let seeded = seeded_store().await;
    let alice = seeded.alice_principal();
    let bob = seeded.bob_principal();
    let service = service_over(seeded);

    service
        .create_post(&alice, NewPost::new("Rust diary", "day one"))
        .await
        .unwrap();
    service
        .create_post(&bob, NewPost::new("Rust diary", "day one"))
        .await
        .unwrap();

    // Bob's matching post is invisible to Alice even though it matches.
    let page = service
        .list_posts(&alice, Some("rust"), 1, None)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].author_id, alice.id);
}

#[tokio::test]
async fn get_post_is_served_from_cache() {
    let (service, loads, admin) = counting_service().await;

    let post = service
        .create_post(&admin, draft_post("Cached"))
        .await
        .unwrap();

    service.get_post(&admin, post.id).await.unwrap();
    service.get_post(&admin, post.id).await.unwrap();
    service.get_post(&admin, post.id).await.unwrap();

    // Three reads, one projection load.
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn update_refreshes_cache_warm() {
    let (service, loads, admin) = counting_service().await;

    let post = service
        .create_post(&admin, draft_post("Original"))
        .await
        .unwrap();
    service.get_post(&admin, post.id).await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    // The update repopulates the entry itself...
    let updated = service
        .update_post(&admin, post.id, PostPatch::default().title("Fresh"))
        .await
        .unwrap();
    assert_eq!(updated.post.title, "Fresh");
    assert_eq!(loads.load(Ordering::SeqCst), 2);

    // ...so the follow-up read is warm and never stale.
    let fetched = service.get_post(&admin, post.id).await.unwrap();
    assert_eq!(fetched.post.title, "Fresh");
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn update_is_visible_to_every_authorized_reader() {
    let seeded = seeded_store().await;
    let alice = seeded.alice_principal();
    let admin = seeded.admin_principal();
    let service = service_over(seeded);

    let post = service
        .create_post(&alice, draft_post("before"))
        .await
        .unwrap();
    service.get_post(&alice, post.id).await.unwrap();

    service
        .update_post(&admin, post.id, PostPatch::default().title("after"))
        .await
        .unwrap();

    for principal in [&alice, &admin] {
        let fetched = service.get_post(principal, post.id).await.unwrap();
        assert_eq!(fetched.post.title, "after");
    }
}

#[tokio::test]
async fn delete_purges_the_cache_entry() {
    let seeded = seeded_store().await;
    let admin = seeded.admin_principal();
    let service = service_over(seeded);

    let post = service
        .create_post(&admin, published_post("doomed"))
        .await
        .unwrap();
    service.get_post(&admin, post.id).await.unwrap();

    service.delete_post(&admin, post.id).await.unwrap();

    let err = service.get_post(&admin, post.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn list_pagination_defaults_and_metadata() {
    let seeded = seeded_store().await;
    let alice = seeded.alice_principal();
    let service = service_over(seeded);

    for i in 0..12 {
        service
            .create_post(&alice, draft_post(&format!("p{}", i)))
            .await
            .unwrap();
    }

    let first = service.list_posts(&alice, None, 1, None).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 12);
    assert_eq!(first.total_pages(), 2);

    let second = service.list_posts(&alice, None, 2, None).await.unwrap();
    assert_eq!(second.items.len(), 2);

    let small = service.list_posts(&alice, None, 1, Some(5)).await.unwrap();
    assert_eq!(small.items.len(), 5);
    assert_eq!(small.per_page, 5);
}
