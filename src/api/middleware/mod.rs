//! API middleware.

mod guard;

pub use guard::{access_guard, expired_session_cookie, session_cookie};
