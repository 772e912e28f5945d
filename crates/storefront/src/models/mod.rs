//! Types the storefront keeps outside the store.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
