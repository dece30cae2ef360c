//! Test fixtures: principals, account inputs, and seeded stores.

use rand::Rng;

use pressroom_core::{
    AdminAccount, NewAdmin, NewPost, NewUser, PostStatus, Principal, UserAccount,
};
use pressroom_store::{MemoryStore, Store};

/// A random email that will not collide with other fixtures in the same
/// process.
pub fn unique_email(prefix: &str) -> String {
    let suffix: u64 = rand::thread_rng().gen();
    format!("{}-{:016x}@example.com", prefix, suffix)
}

/// Admin account input with a unique email.
pub fn new_admin(name: &str) -> NewAdmin {
    NewAdmin {
        name: name.to_string(),
        email: unique_email(name),
    }
}

/// User account input with a unique email.
pub fn new_user(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: unique_email(name),
    }
}

/// A draft post input.
pub fn draft_post(title: &str) -> NewPost {
    NewPost::new(title, format!("Body of {}", title))
}

/// A published post input.
pub fn published_post(title: &str) -> NewPost {
    NewPost::new(title, format!("Body of {}", title)).status(PostStatus::Published)
}

/// A memory store seeded with one admin and two users.
pub struct SeededStore {
    pub store: MemoryStore,
    pub admin: AdminAccount,
    pub alice: UserAccount,
    pub bob: UserAccount,
}

impl SeededStore {
    pub fn admin_principal(&self) -> Principal {
        Principal::admin(self.admin.id.get())
    }

    pub fn alice_principal(&self) -> Principal {
        Principal::user(self.alice.id.get())
    }

    pub fn bob_principal(&self) -> Principal {
        Principal::user(self.bob.id.get())
    }
}

/// Seed a fresh [`MemoryStore`] with one admin ("root") and two users
/// ("alice", "bob").
pub async fn seeded_store() -> SeededStore {
    let store = MemoryStore::new();

    let admin = store
        .insert_admin(&new_admin("root"))
        .await
        .expect("seed admin");
    let alice = store
        .insert_user(&new_user("alice"))
        .await
        .expect("seed alice");
    let bob = store.insert_user(&new_user("bob")).await.expect("seed bob");

    SeededStore {
        store,
        admin,
        alice,
        bob,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_emails_differ() {
        assert_ne!(unique_email("a"), unique_email("a"));
    }

    #[tokio::test]
    async fn test_seeded_store_has_accounts() {
        let seeded = seeded_store().await;
        assert_eq!(seeded.store.count_users().await.unwrap(), 2);
        assert!(seeded
            .store
            .get_admin(seeded.admin.id)
            .await
            .unwrap()
            .is_some());
        assert_ne!(seeded.alice.id, seeded.bob.id);
    }
}
