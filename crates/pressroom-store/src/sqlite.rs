//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking. The connection mutex
//! makes every operation a single-writer critical section, which is what
//! gives `update_post` its read-modify-write atomicity.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::debug;

use pressroom_core::{
    AdminAccount, AdminPatch, AuthorInfo, NewAdmin, NewPost, NewUser, Post, PostId, PostPatch,
    PostStatus, PostWithAuthor, Principal, PrincipalId, Role, UserAccount,
};
use pressroom_policy::Visibility;

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{now_millis, Page, PostQuery, Store, TopAuthor};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking to
/// avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "opening sqlite store");
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the locked connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Background(e.to_string()))?
    }
}

const POST_COLUMNS: &str =
    "id, title, content, author_id, author_role, status, image, created_at, updated_at";

// Helper to convert a row to Post
fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    let role_str: String = row.get("author_role")?;
    let status_str: String = row.get("status")?;

    let author_role = Role::parse(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown author_role: {}", role_str).into(),
        )
    })?;
    let status = PostStatus::parse(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            format!("unknown status: {}", status_str).into(),
        )
    })?;

    Ok(Post {
        id: PostId::new(row.get("id")?),
        title: row.get("title")?,
        content: row.get("content")?,
        author_id: PrincipalId::new(row.get("author_id")?),
        author_role,
        status,
        image: row.get("image")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn row_to_admin(row: &rusqlite::Row<'_>) -> rusqlite::Result<AdminAccount> {
    Ok(AdminAccount {
        id: PrincipalId::new(row.get("id")?),
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserAccount> {
    Ok(UserAccount {
        id: PrincipalId::new(row.get("id")?),
        name: row.get("name")?,
        email: row.get("email")?,
    })
}

/// Map a UNIQUE-constraint failure on an email column to `EmailTaken`.
///
/// Only the UNIQUE extended code qualifies; other constraint violations on
/// the same statement stay `Database` errors.
fn map_email_conflict(err: rusqlite::Error, email: &str) -> StoreError {
    if let rusqlite::Error::SqliteFailure(e, _) = &err {
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return StoreError::EmailTaken(email.to_string());
        }
    }
    StoreError::Database(err)
}

/// Fetch a post by id on an already-locked connection.
fn get_post_sync(conn: &Connection, id: PostId) -> Result<Option<Post>> {
    conn.query_row(
        &format!("SELECT {} FROM posts WHERE id = ?1", POST_COLUMNS),
        params![id.get()],
        row_to_post,
    )
    .optional()
    .map_err(StoreError::from)
}

/// Resolve the owner projection through the account table matching the
/// post's role tag.
fn author_info_sync(conn: &Connection, post: &Post) -> Result<Option<AuthorInfo>> {
    let table = match post.author_role {
        Role::Admin => "admins",
        Role::User => "users",
    };
    let name: Option<String> = conn
        .query_row(
            &format!("SELECT name FROM {} WHERE id = ?1", table),
            params![post.author_id.get()],
            |row| row.get(0),
        )
        .optional()?;

    Ok(name.map(|name| AuthorInfo {
        id: post.author_id,
        role: post.author_role,
        name,
    }))
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_post(&self, author: &Principal, input: &NewPost) -> Result<Post> {
        let author = *author;
        let input = input.clone();

        self.with_conn(move |conn| {
            let now = now_millis();
            conn.execute(
                "INSERT INTO posts (title, content, author_id, author_role, status, image,
                                    created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    input.title,
                    input.content,
                    author.id.get(),
                    author.role.as_str(),
                    input.status.as_str(),
                    input.image,
                    now,
                    now,
                ],
            )?;

            let id = PostId::new(conn.last_insert_rowid());
            get_post_sync(conn, id)?.ok_or_else(|| {
                StoreError::InvalidData(format!("inserted post {} not found", id))
            })
        })
        .await
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>> {
        self.with_conn(move |conn| get_post_sync(conn, id)).await
    }

    async fn get_post_with_author(&self, id: PostId) -> Result<Option<PostWithAuthor>> {
        self.with_conn(move |conn| {
            let Some(post) = get_post_sync(conn, id)? else {
                return Ok(None);
            };
            let author = author_info_sync(conn, &post)?;
            Ok(Some(PostWithAuthor { post, author }))
        })
        .await
    }

    async fn find_posts(&self, query: &PostQuery) -> Result<Page<Post>> {
        let query = query.clone();

        self.with_conn(move |conn| {
            // The scope and search are pushed down as WHERE clauses backed
            // by idx_posts_author; the full set is never materialized.
            let mut clauses: Vec<&str> = Vec::new();
            let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

            if let Visibility::OwnedBy(owner) = query.visibility {
                clauses.push("author_id = ?");
                args.push(Box::new(owner.get()));
            }
            if let Some(search) = &query.search {
                clauses.push("(title LIKE '%' || ? || '%' OR content LIKE '%' || ? || '%')");
                args.push(Box::new(search.clone()));
                args.push(Box::new(search.clone()));
            }

            let where_sql = if clauses.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", clauses.join(" AND "))
            };

            let total: u64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM posts{}", where_sql),
                params_from_iter(args.iter()),
                |row| row.get(0),
            )?;

            args.push(Box::new(query.per_page as i64));
            args.push(Box::new(query.offset() as i64));

            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM posts{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
                POST_COLUMNS, where_sql
            ))?;
            let items = stmt
                .query_map(params_from_iter(args.iter()), row_to_post)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Page {
                items,
                total,
                page: query.page.max(1),
                per_page: query.per_page,
            })
        })
        .await
    }

    async fn update_post(&self, id: PostId, patch: &PostPatch) -> Result<Option<Post>> {
        let patch = patch.clone();

        // Read-modify-write under the connection mutex: no lost updates.
        self.with_conn(move |conn| {
            let Some(mut post) = get_post_sync(conn, id)? else {
                return Ok(None);
            };

            if let Some(title) = patch.title {
                post.title = title;
            }
            if let Some(content) = patch.content {
                post.content = content;
            }
            if let Some(status) = patch.status {
                post.status = status;
            }
            if let Some(image) = patch.image {
                post.image = Some(image);
            }
            post.updated_at = now_millis();

            conn.execute(
                "UPDATE posts SET title = ?1, content = ?2, status = ?3, image = ?4,
                                  updated_at = ?5
                 WHERE id = ?6",
                params![
                    post.title,
                    post.content,
                    post.status.as_str(),
                    post.image,
                    post.updated_at,
                    id.get(),
                ],
            )?;

            Ok(Some(post))
        })
        .await
    }

    async fn delete_post(&self, id: PostId) -> Result<bool> {
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM posts WHERE id = ?1", params![id.get()])?;
            Ok(changed > 0)
        })
        .await
    }

    async fn insert_admin(&self, input: &NewAdmin) -> Result<AdminAccount> {
        let input = input.clone();

        self.with_conn(move |conn| {
            let now = now_millis();
            conn.execute(
                "INSERT INTO admins (name, email, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![input.name, input.email, now, now],
            )
            .map_err(|e| map_email_conflict(e, &input.email))?;

            Ok(AdminAccount {
                id: PrincipalId::new(conn.last_insert_rowid()),
                name: input.name,
                email: input.email,
                created_at: now,
                updated_at: now,
            })
        })
        .await
    }

    async fn get_admin(&self, id: PrincipalId) -> Result<Option<AdminAccount>> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT id, name, email, created_at, updated_at FROM admins WHERE id = ?1",
                params![id.get()],
                row_to_admin,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn list_admins(&self, page: u32, per_page: u32) -> Result<Page<AdminAccount>> {
        self.with_conn(move |conn| {
            let total: u64 = conn.query_row("SELECT COUNT(*) FROM admins", [], |row| row.get(0))?;

            let offset = (page.max(1) as i64 - 1) * per_page as i64;
            let mut stmt = conn.prepare(
                "SELECT id, name, email, created_at, updated_at FROM admins
                 ORDER BY id ASC LIMIT ?1 OFFSET ?2",
            )?;
            let items = stmt
                .query_map(params![per_page as i64, offset], row_to_admin)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Page {
                items,
                total,
                page: page.max(1),
                per_page,
            })
        })
        .await
    }

    async fn update_admin(
        &self,
        id: PrincipalId,
        patch: &AdminPatch,
    ) -> Result<Option<AdminAccount>> {
        let patch = patch.clone();

        self.with_conn(move |conn| {
            let existing = conn
                .query_row(
                    "SELECT id, name, email, created_at, updated_at FROM admins WHERE id = ?1",
                    params![id.get()],
                    row_to_admin,
                )
                .optional()?;
            let Some(mut admin) = existing else {
                return Ok(None);
            };

            if let Some(name) = patch.name {
                admin.name = name;
            }
            if let Some(email) = patch.email {
                admin.email = email;
            }
            admin.updated_at = now_millis();

            conn.execute(
                "UPDATE admins SET name = ?1, email = ?2, updated_at = ?3 WHERE id = ?4",
                params![admin.name, admin.email, admin.updated_at, id.get()],
            )
            .map_err(|e| map_email_conflict(e, &admin.email))?;

            Ok(Some(admin))
        })
        .await
    }

    async fn delete_admin(&self, id: PrincipalId) -> Result<bool> {
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM admins WHERE id = ?1", params![id.get()])?;
            Ok(changed > 0)
        })
        .await
    }

    async fn insert_user(&self, input: &NewUser) -> Result<UserAccount> {
        let input = input.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO users (name, email) VALUES (?1, ?2)",
                params![input.name, input.email],
            )
            .map_err(|e| map_email_conflict(e, &input.email))?;

            Ok(UserAccount {
                id: PrincipalId::new(conn.last_insert_rowid()),
                name: input.name,
                email: input.email,
            })
        })
        .await
    }

    async fn get_user(&self, id: PrincipalId) -> Result<Option<UserAccount>> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT id, name, email FROM users WHERE id = ?1",
                params![id.get()],
                row_to_user,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn count_users(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: u64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
    }

    async fn count_posts_by_status(&self, status: PostStatus) -> Result<u64> {
        self.with_conn(move |conn| {
            let count: u64 = conn.query_row(
                "SELECT COUNT(*) FROM posts WHERE status = ?1",
                params![status.as_str()],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
    }

    async fn top_user_authors(&self, limit: usize) -> Result<Vec<TopAuthor>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT u.id, u.name, COUNT(p.id) AS post_count
                 FROM users u
                 LEFT JOIN posts p ON p.author_id = u.id AND p.author_role = 'user'
                 GROUP BY u.id, u.name
                 ORDER BY post_count DESC, u.id ASC
                 LIMIT ?1",
            )?;
            let authors = stmt
                .query_map(params![limit as i64], |row| {
                    Ok(TopAuthor {
                        user_id: PrincipalId::new(row.get(0)?),
                        name: row.get(1)?,
                        post_count: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(authors)
        })
        .await
    }
}
