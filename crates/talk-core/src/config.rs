use crate::error::{Result, TalkError};
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_BASE_URL: &str = "https://kapi.kakao.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub chat_list: ChatListConfig,
    /// Token verification server used by demo apps. Carried, never called.
    #[serde(default)]
    pub verify_server_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatListConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.into(),
                timeout_secs: 10,
                user_agent: format!("talk-client/{}", env!("CARGO_PKG_VERSION")),
            },
            chat_list: ChatListConfig {
                default_limit: 30,
                max_limit: 100,
            },
            verify_server_url: None,
        }
    }
}

impl ClientConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Defaults overlaid with `TALK_API_BASE_URL`, `TALK_API_TIMEOUT_SECS`
    /// and `TALK_VERIFY_SERVER_URL`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = env::var("TALK_API_BASE_URL") {
            config.api.base_url = url;
        }
        if let Ok(secs) = env::var("TALK_API_TIMEOUT_SECS") {
            config.api.timeout_secs = secs.trim().parse().map_err(|_| {
                TalkError::Validation(format!("TALK_API_TIMEOUT_SECS is not a number: {secs}"))
            })?;
        }
        if let Ok(url) = env::var("TALK_VERIFY_SERVER_URL") {
            config.verify_server_url = Some(url);
        }
        tracing::debug!(base_url = %config.api.base_url, "loaded client config from env");
        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.api.timeout_secs = secs;
        self
    }
}
