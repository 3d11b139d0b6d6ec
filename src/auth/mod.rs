mod crypto;
mod identity;

pub use crypto::{hash_password, verify_password};
pub use identity::Identity;
pub(crate) use identity::require_user;
