//! Custom extractors.

mod session;
mod validated_json;

pub use session::{require_admin, require_role, CurrentUser};
pub use validated_json::ValidatedJson;
