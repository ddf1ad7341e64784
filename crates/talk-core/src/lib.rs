//! Value types, error taxonomy and configuration shared by the talk client crates.

pub mod chat;
pub mod config;
pub mod error;
pub mod profile;
pub mod types;

pub use chat::{Chat, ChatContext, ChatOrder, ChatPage, ChatType};
pub use config::ClientConfig;
pub use error::{ErrorKind, Result, TalkError};
pub use profile::UserProfile;
pub use types::{MessageTemplate, ReceiverType, TemplateArgs, UserInfo};
