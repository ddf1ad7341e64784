//! Authenticated session state for delegated talk API calls.

pub mod manager;
pub mod session;

pub use manager::AuthSession;
pub use session::*;
