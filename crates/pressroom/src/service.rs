//! The content service: the unified operation surface.
//!
//! Every operation takes the acting [`Principal`] explicitly, runs it
//! through the authorization engine, scopes queries through the visibility
//! scoper, and keeps the projection cache consistent with every mutation.

use std::sync::Arc;

use tracing::{info, warn};

use pressroom_cache::ReadThroughCache;
use pressroom_core::{
    validate_admin_patch, validate_new_admin, validate_new_post, validate_post_patch,
    AdminAccount, AdminPatch, NewAdmin, NewPost, Post, PostId, PostPatch, PostWithAuthor,
    Principal, PrincipalId,
};
use pressroom_policy::{authorize, scope, Action, Target};
use pressroom_store::{Page, PostQuery, Store};

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::stats::{self, DashboardStats};

/// The main service struct.
///
/// Generic over the storage backend. Owns the projection cache: one
/// instance per process, constructed by the embedder and shared across
/// request tasks - never a process-wide singleton reached through statics.
pub struct ContentService<S: Store> {
    store: Arc<S>,
    cache: ReadThroughCache<PostWithAuthor>,
    config: ServiceConfig,
}

/// Cache key for a post projection.
fn post_key(id: PostId) -> String {
    format!("post:{}", id)
}

impl<S: Store> ContentService<S> {
    /// Create a service over the given store.
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self {
            store: Arc::new(store),
            cache: ReadThroughCache::new(config.cache_ttl),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Load the post projection through the cache.
    async fn cached_projection(&self, id: PostId) -> Result<PostWithAuthor> {
        let store = Arc::clone(&self.store);
        self.cache
            .get_or_load(&post_key(id), || async move {
                store
                    .get_post_with_author(id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("post {}", id)))
            })
            .await
    }

    /// Fetch a post or fail with NotFound.
    async fn require_post(&self, id: PostId) -> Result<Post> {
        self.store
            .get_post(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("post {}", id)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Post Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// List posts visible to the principal, newest first.
    ///
    /// Listing is universally allowed; the visibility scope narrows what
    /// comes back instead of denying the call.
    pub async fn list_posts(
        &self,
        principal: &Principal,
        search: Option<&str>,
        page: u32,
        per_page: Option<u32>,
    ) -> Result<Page<Post>> {
        if !authorize(principal, Action::List, Target::Posts) {
            return Err(ServiceError::Forbidden(
                "you do not have permission to view posts".into(),
            ));
        }

        let mut query = PostQuery::new(scope(principal))
            .page(page)
            .per_page(per_page.unwrap_or(self.config.default_page_size));
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            query = query.search(search);
        }

        Ok(self.store.find_posts(&query).await?)
    }

    /// Create a post owned by the acting principal.
    ///
    /// Author fields are stamped from `principal`, never from the input.
    pub async fn create_post(&self, principal: &Principal, input: NewPost) -> Result<Post> {
        if !authorize(principal, Action::Create, Target::Posts) {
            return Err(ServiceError::Forbidden(
                "you do not have permission to create posts".into(),
            ));
        }
        validate_new_post(&input)?;

        let post = self.store.insert_post(principal, &input).await?;
        info!(post_id = %post.id, author = %principal, "post created");
        Ok(post)
    }

    /// Get a single post with its owner projection, served through the
    /// cache.
    pub async fn get_post(&self, principal: &Principal, id: PostId) -> Result<PostWithAuthor> {
        let post = self.require_post(id).await?;

        if !authorize(principal, Action::View, Target::Post(&post)) {
            warn!(post_id = %id, principal = %principal, "denied post view");
            return Err(ServiceError::Forbidden(
                "you do not have permission to view this post".into(),
            ));
        }

        self.cached_projection(id).await
    }

    /// Update a post and refresh its cached projection.
    ///
    /// The cache entry is invalidated and immediately repopulated, so the
    /// next read is warm rather than cold.
    pub async fn update_post(
        &self,
        principal: &Principal,
        id: PostId,
        patch: PostPatch,
    ) -> Result<PostWithAuthor> {
        validate_post_patch(&patch)?;

        let post = self.require_post(id).await?;
        if !authorize(principal, Action::Update, Target::Post(&post)) {
            warn!(post_id = %id, principal = %principal, "denied post update");
            return Err(ServiceError::Forbidden(
                "you do not have permission to update this post".into(),
            ));
        }

        let updated = self
            .store
            .update_post(id, &patch)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("post {}", id)))?;

        // Invalidate-then-repopulate: the stale entry is dropped before the
        // fresh projection is published.
        self.cache.invalidate(&post_key(id));
        let projection = self.cached_projection(id).await?;

        info!(post_id = %updated.id, principal = %principal, "post updated");
        Ok(projection)
    }

    /// Delete a post and purge its cache entry.
    pub async fn delete_post(&self, principal: &Principal, id: PostId) -> Result<()> {
        let post = self.require_post(id).await?;

        if !authorize(principal, Action::Delete, Target::Post(&post)) {
            warn!(post_id = %id, principal = %principal, "denied post delete");
            return Err(ServiceError::Forbidden(
                "you do not have permission to delete this post".into(),
            ));
        }

        self.store.delete_post(id).await?;
        self.cache.invalidate(&post_key(id));

        info!(post_id = %id, principal = %principal, "post deleted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Admin Account Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// List admin accounts. Admin-only.
    pub async fn list_admins(
        &self,
        principal: &Principal,
        page: u32,
        per_page: Option<u32>,
    ) -> Result<Page<AdminAccount>> {
        if !authorize(principal, Action::List, Target::Admins) {
            return Err(ServiceError::Forbidden(
                "you do not have permission to view admins".into(),
            ));
        }

        let per_page = per_page.unwrap_or(self.config.default_page_size);
        Ok(self.store.list_admins(page, per_page).await?)
    }

    /// Create an admin account. Admin-only.
    pub async fn create_admin(
        &self,
        principal: &Principal,
        input: NewAdmin,
    ) -> Result<AdminAccount> {
        if !authorize(principal, Action::Create, Target::Admins) {
            return Err(ServiceError::Forbidden(
                "you do not have permission to create admins".into(),
            ));
        }
        validate_new_admin(&input)?;

        let admin = self.store.insert_admin(&input).await?;
        info!(admin_id = %admin.id, created_by = %principal, "admin created");
        Ok(admin)
    }

    /// Get an admin account. Admin-only.
    pub async fn get_admin(
        &self,
        principal: &Principal,
        id: PrincipalId,
    ) -> Result<AdminAccount> {
        if !authorize(principal, Action::View, Target::Admin(id)) {
            return Err(ServiceError::Forbidden(
                "you do not have permission to view this admin".into(),
            ));
        }

        self.store
            .get_admin(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("admin {}", id)))
    }

    /// Update an admin account. Admin-only.
    pub async fn update_admin(
        &self,
        principal: &Principal,
        id: PrincipalId,
        patch: AdminPatch,
    ) -> Result<AdminAccount> {
        if !authorize(principal, Action::Update, Target::Admin(id)) {
            return Err(ServiceError::Forbidden(
                "you do not have permission to update this admin".into(),
            ));
        }
        validate_admin_patch(&patch)?;

        self.store
            .update_admin(id, &patch)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("admin {}", id)))
    }

    /// Delete an admin account. Admin-only, and never the acting admin
    /// itself.
    pub async fn delete_admin(&self, principal: &Principal, id: PrincipalId) -> Result<()> {
        if !authorize(principal, Action::Delete, Target::Admin(id)) {
            warn!(admin_id = %id, principal = %principal, "denied admin delete");
            return Err(ServiceError::Forbidden(
                "you do not have permission to delete this admin".into(),
            ));
        }

        if !self.store.delete_admin(id).await? {
            return Err(ServiceError::NotFound(format!("admin {}", id)));
        }

        info!(admin_id = %id, deleted_by = %principal, "admin deleted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dashboard
    // ─────────────────────────────────────────────────────────────────────────

    /// Compute the dashboard rollup. Admin-only.
    pub async fn dashboard_stats(&self, principal: &Principal) -> Result<DashboardStats> {
        if !principal.is_admin() {
            return Err(ServiceError::Forbidden(
                "the dashboard is restricted to admins".into(),
            ));
        }

        Ok(stats::compute(self.store.as_ref(), self.config.top_authors_limit).await?)
    }
}
