pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiQuery, AuthUser};
pub use state::AppState;
