//! Session and authentication middleware.

pub mod auth;
pub mod session;

pub use auth::{OptionalUser, RequireAdmin, RequireUser};
pub use session::{memory_session_layer, postgres_session_layer, SESSION_COOKIE_NAME};
