mod auth;
mod health_check;

pub use auth::{authenticate, change_password, get_user_by_token, refresh_token, register};
pub use health_check::health_check;
