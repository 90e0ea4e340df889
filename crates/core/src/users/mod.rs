mod mock_data;
mod operations;
mod requests;
mod types;

pub use mock_data::seed_users;
pub use operations::{apply_patch, matches_search, sort_users};
pub use requests::{CreateUserInput, UserPatch};
pub use types::User;
