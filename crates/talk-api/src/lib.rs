//! Delegated talk API calls made on behalf of the logged-in user.
//!
//! Every call snapshots the [`AuthSession`](talk_session::AuthSession)
//! credential, sends exactly one request through a [`Transport`] and
//! settles exactly once.

pub mod http;
pub mod legacy;
pub mod talk;
pub mod task;
pub mod transport;

pub use http::HttpTransport;
pub use legacy::LegacyReceiver;
pub use talk::TalkApi;
pub use task::SessionTask;
pub use transport::{ApiRequest, ApiResponse, HttpMethod, Transport};
