//! Contract of the backend users API consumed by the console.

mod error;
mod http_mapping;
mod traits;

pub use error::{ApiError, Result};
pub use http_mapping::status_code_to_api_error;
pub use traits::UsersApi;
