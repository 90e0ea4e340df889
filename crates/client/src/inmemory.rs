//! In-memory users API.
//!
//! Backs the `--demo` mode of the CLI and the test suites.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use registrar_core::api::{self, ApiError, UsersApi};
use registrar_core::users::{
    apply_patch, matches_search, seed_users, sort_users, CreateUserInput, User, UserPatch,
};

/// In-memory backend for the users API.
///
/// Uses a HashMap wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUsersApi {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUsersApi {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding exactly `users`.
    pub fn with_users(users: Vec<User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Creates a backend pre-populated with sample registrations.
    pub fn seeded() -> Self {
        Self::with_users(seed_users().into_iter().map(new_user).collect())
    }

    async fn sorted(&self, term: Option<&str>) -> Vec<User> {
        let users = self.users.read().await;
        let mut found: Vec<User> = users
            .values()
            .filter(|user| term.is_none_or(|term| matches_search(user, term)))
            .cloned()
            .collect();
        sort_users(&mut found);
        found
    }
}

fn new_user(input: CreateUserInput) -> User {
    User::new(Uuid::new_v4().to_string(), input.first_name, input.last_name)
}

#[async_trait]
impl UsersApi for InMemoryUsersApi {
    async fn get_users(&self) -> api::Result<Vec<User>> {
        Ok(self.sorted(None).await)
    }

    async fn search_user(&self, term: &str) -> api::Result<Vec<User>> {
        Ok(self.sorted(Some(term)).await)
    }

    async fn create_user(&self, input: CreateUserInput) -> api::Result<User> {
        let user = new_user(input);
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user.clone());
        tracing::debug!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> api::Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound { id: id.to_string() })?;
        apply_patch(user, &patch);
        tracing::debug!(user_id = %id, "User updated");
        Ok(user.clone())
    }

    async fn delete_user(&self, id: &str) -> api::Result<()> {
        let mut users = self.users.write().await;
        if users.remove(id).is_none() {
            return Err(ApiError::NotFound { id: id.to_string() });
        }
        tracing::debug!(user_id = %id, "User deleted");
        Ok(())
    }
}

/// Holds one operation of an [`InMemoryUsersApi`] until released.
#[cfg(test)]
pub(crate) struct GatedUsersApi {
    inner: InMemoryUsersApi,
    gated: &'static str,
    open: tokio::sync::watch::Sender<bool>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl GatedUsersApi {
    pub(crate) fn new(inner: InMemoryUsersApi, gated: &'static str) -> Self {
        Self {
            inner,
            gated,
            open: tokio::sync::watch::Sender::new(false),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Lets every held and future call through.
    pub(crate) fn release(&self) {
        self.open.send_replace(true);
    }

    /// Number of calls made to the gated operation.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Waits until the gated operation has been called `n` times.
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        for _ in 0..200 {
            if self.calls() >= n {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("{} was called {} times, expected {}", self.gated, self.calls(), n);
    }

    async fn pass(&self, operation: &str) {
        if operation != self.gated {
            return;
        }
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut open = self.open.subscribe();
        loop {
            let is_open = *open.borrow_and_update();
            if is_open || open.changed().await.is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
#[async_trait]
impl UsersApi for GatedUsersApi {
    async fn get_users(&self) -> api::Result<Vec<User>> {
        self.pass("get_users").await;
        self.inner.get_users().await
    }

    async fn search_user(&self, term: &str) -> api::Result<Vec<User>> {
        self.pass("search_user").await;
        self.inner.search_user(term).await
    }

    async fn create_user(&self, input: CreateUserInput) -> api::Result<User> {
        self.pass("create_user").await;
        self.inner.create_user(input).await
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> api::Result<User> {
        self.pass("update_user").await;
        self.inner.update_user(id, patch).await
    }

    async fn delete_user(&self, id: &str) -> api::Result<()> {
        self.pass("delete_user").await;
        self.inner.delete_user(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let api = InMemoryUsersApi::new();
        let a = api
            .create_user(CreateUserInput::new("Ada", "Lovelace"))
            .await
            .unwrap();
        let b = api
            .create_user(CreateUserInput::new("Ada", "Lovelace"))
            .await
            .unwrap();

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(api.get_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_users_is_sorted() {
        let api = InMemoryUsersApi::with_users(vec![
            User::new("1", "Alan", "Turing"),
            User::new("2", "Jane", "Austen"),
        ]);
        let names: Vec<String> = api
            .get_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.last_name)
            .collect();
        assert_eq!(names, vec!["Austen", "Turing"]);
    }

    #[tokio::test]
    async fn test_search() {
        let api = InMemoryUsersApi::with_users(vec![
            User::new("1", "Jane", "Austen"),
            User::new("2", "Ada", "Lovelace"),
            User::new("3", "Mary", "Jane"),
        ]);

        let ids: Vec<String> = api
            .search_user("jane")
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);

        assert_eq!(api.search_user("").await.unwrap().len(), 3);
        assert!(api.search_user("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let api = InMemoryUsersApi::with_users(vec![User::new("1", "Ada", "King")]);
        let user = api
            .update_user("1", UserPatch::default().with_last_name("Lovelace"))
            .await
            .unwrap();
        assert_eq!(user, User::new("1", "Ada", "Lovelace"));
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let api = InMemoryUsersApi::new();
        assert_eq!(
            api.update_user("missing", UserPatch::default()).await,
            Err(ApiError::NotFound {
                id: "missing".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let api = InMemoryUsersApi::with_users(vec![User::new("1", "Ada", "Lovelace")]);
        api.delete_user("1").await.unwrap();
        assert!(api.get_users().await.unwrap().is_empty());
        assert!(matches!(
            api.delete_user("1").await,
            Err(ApiError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_seeded_has_sample_users() {
        let api = InMemoryUsersApi::seeded();
        assert_eq!(api.get_users().await.unwrap().len(), seed_users().len());
    }
}
