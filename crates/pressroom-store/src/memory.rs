//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite but
//! keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use pressroom_core::{
    AdminAccount, AdminPatch, AuthorInfo, NewAdmin, NewPost, NewUser, Post, PostId, PostPatch,
    PostStatus, PostWithAuthor, Principal, PrincipalId, Role, UserAccount,
};

use crate::error::{Result, StoreError};
use crate::traits::{now_millis, Page, PostQuery, Store, TopAuthor};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; a
/// mutation holds the write lock for its whole read-modify-write, which
/// gives the same per-record atomicity as the SQLite connection mutex.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    posts: HashMap<PostId, Post>,
    admins: HashMap<PrincipalId, AdminAccount>,
    users: HashMap<PrincipalId, UserAccount>,
    next_post_id: i64,
    next_admin_id: i64,
    next_user_id: i64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                posts: HashMap::new(),
                admins: HashMap::new(),
                users: HashMap::new(),
                next_post_id: 1,
                next_admin_id: 1,
                next_user_id: 1,
            }),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_search(post: &Post, search: &str) -> bool {
    let needle = search.to_lowercase();
    post.title.to_lowercase().contains(&needle) || post.content.to_lowercase().contains(&needle)
}

fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> Page<T> {
    let total = items.len() as u64;
    let offset = (page.max(1) as usize - 1).saturating_mul(per_page as usize);
    let items = items
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect();
    Page {
        items,
        total,
        page: page.max(1),
        per_page,
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_post(&self, author: &Principal, input: &NewPost) -> Result<Post> {
        let mut inner = self.write()?;

        let id = PostId::new(inner.next_post_id);
        inner.next_post_id += 1;

        let now = now_millis();
        let post = Post {
            id,
            title: input.title.clone(),
            content: input.content.clone(),
            author_id: author.id,
            author_role: author.role,
            status: input.status,
            image: input.image.clone(),
            created_at: now,
            updated_at: now,
        };

        inner.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>> {
        let inner = self.read()?;
        Ok(inner.posts.get(&id).cloned())
    }

    async fn get_post_with_author(&self, id: PostId) -> Result<Option<PostWithAuthor>> {
        let inner = self.read()?;

        let Some(post) = inner.posts.get(&id).cloned() else {
            return Ok(None);
        };

        // Owner resolution goes through the account table matching the
        // post's role tag.
        let author = match post.author_role {
            Role::Admin => inner.admins.get(&post.author_id).map(|a| AuthorInfo {
                id: a.id,
                role: Role::Admin,
                name: a.name.clone(),
            }),
            Role::User => inner.users.get(&post.author_id).map(|u| AuthorInfo {
                id: u.id,
                role: Role::User,
                name: u.name.clone(),
            }),
        };

        Ok(Some(PostWithAuthor { post, author }))
    }

    async fn find_posts(&self, query: &PostQuery) -> Result<Page<Post>> {
        let inner = self.read()?;

        let mut matching: Vec<Post> = inner
            .posts
            .values()
            .filter(|p| query.visibility.allows(p))
            .filter(|p| {
                query
                    .search
                    .as_deref()
                    .map_or(true, |s| matches_search(p, s))
            })
            .cloned()
            .collect();

        // Newest first, id as the tiebreak for same-millisecond inserts.
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(paginate(matching, query.page, query.per_page))
    }

    async fn update_post(&self, id: PostId, patch: &PostPatch) -> Result<Option<Post>> {
        let mut inner = self.write()?;

        let Some(post) = inner.posts.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = &patch.title {
            post.title = title.clone();
        }
        if let Some(content) = &patch.content {
            post.content = content.clone();
        }
        if let Some(status) = patch.status {
            post.status = status;
        }
        if let Some(image) = &patch.image {
            post.image = Some(image.clone());
        }
        post.updated_at = now_millis();

        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: PostId) -> Result<bool> {
        let mut inner = self.write()?;
        Ok(inner.posts.remove(&id).is_some())
    }

    async fn insert_admin(&self, input: &NewAdmin) -> Result<AdminAccount> {
        let mut inner = self.write()?;

        if inner.admins.values().any(|a| a.email == input.email) {
            return Err(StoreError::EmailTaken(input.email.clone()));
        }

        let id = PrincipalId::new(inner.next_admin_id);
        inner.next_admin_id += 1;

        let now = now_millis();
        let admin = AdminAccount {
            id,
            name: input.name.clone(),
            email: input.email.clone(),
            created_at: now,
            updated_at: now,
        };

        inner.admins.insert(id, admin.clone());
        Ok(admin)
    }

    async fn get_admin(&self, id: PrincipalId) -> Result<Option<AdminAccount>> {
        let inner = self.read()?;
        Ok(inner.admins.get(&id).cloned())
    }

    async fn list_admins(&self, page: u32, per_page: u32) -> Result<Page<AdminAccount>> {
        let inner = self.read()?;

        let mut admins: Vec<AdminAccount> = inner.admins.values().cloned().collect();
        admins.sort_by_key(|a| a.id);

        Ok(paginate(admins, page, per_page))
    }

    async fn update_admin(
        &self,
        id: PrincipalId,
        patch: &AdminPatch,
    ) -> Result<Option<AdminAccount>> {
        let mut inner = self.write()?;

        if let Some(email) = &patch.email {
            if inner.admins.values().any(|a| a.id != id && &a.email == email) {
                return Err(StoreError::EmailTaken(email.clone()));
            }
        }

        let Some(admin) = inner.admins.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = &patch.name {
            admin.name = name.clone();
        }
        if let Some(email) = &patch.email {
            admin.email = email.clone();
        }
        admin.updated_at = now_millis();

        Ok(Some(admin.clone()))
    }

    async fn delete_admin(&self, id: PrincipalId) -> Result<bool> {
        let mut inner = self.write()?;
        Ok(inner.admins.remove(&id).is_some())
    }

    async fn insert_user(&self, input: &NewUser) -> Result<UserAccount> {
        let mut inner = self.write()?;

        if inner.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::EmailTaken(input.email.clone()));
        }

        let id = PrincipalId::new(inner.next_user_id);
        inner.next_user_id += 1;

        let user = UserAccount {
            id,
            name: input.name.clone(),
            email: input.email.clone(),
        };

        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: PrincipalId) -> Result<Option<UserAccount>> {
        let inner = self.read()?;
        Ok(inner.users.get(&id).cloned())
    }

    async fn count_users(&self) -> Result<u64> {
        let inner = self.read()?;
        Ok(inner.users.len() as u64)
    }

    async fn count_posts_by_status(&self, status: PostStatus) -> Result<u64> {
        let inner = self.read()?;
        Ok(inner.posts.values().filter(|p| p.status == status).count() as u64)
    }

    async fn top_user_authors(&self, limit: usize) -> Result<Vec<TopAuthor>> {
        let inner = self.read()?;

        let mut authors: Vec<TopAuthor> = inner
            .users
            .values()
            .map(|u| TopAuthor {
                user_id: u.id,
                name: u.name.clone(),
                post_count: inner
                    .posts
                    .values()
                    .filter(|p| p.author_role == Role::User && p.author_id == u.id)
                    .count() as u64,
            })
            .collect();

        authors.sort_by(|a, b| {
            b.post_count
                .cmp(&a.post_count)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        authors.truncate(limit);

        Ok(authors)
    }
}
