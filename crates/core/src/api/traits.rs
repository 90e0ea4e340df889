use async_trait::async_trait;

use crate::users::{CreateUserInput, User, UserPatch};

use super::Result;

/// The backend operations the registration console depends on.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Fetches every registered user.
    async fn get_users(&self) -> Result<Vec<User>>;

    /// Fetches users matching a search term.
    async fn search_user(&self, term: &str) -> Result<Vec<User>>;

    /// Creates a user; the backend assigns its identifier.
    async fn create_user(&self, input: CreateUserInput) -> Result<User>;

    /// Applies a partial update to an existing user.
    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User>;

    /// Deletes a user by identifier.
    async fn delete_user(&self, id: &str) -> Result<()>;
}
