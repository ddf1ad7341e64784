//! Chat rooms and cursor-based chat-list pagination.

use crate::error::{Result, TalkError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat room kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Regular,
    Open,
    Memo,
    Unknown,
}

impl ChatType {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "regular" | "direct" | "multi" => ChatType::Regular,
            "open" | "open_direct" | "open_multi" => ChatType::Open,
            "memo" => ChatType::Memo,
            _ => ChatType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatType::Regular => "regular",
            ChatType::Open => "open",
            ChatType::Memo => "memo",
            ChatType::Unknown => "unknown",
        }
    }
}

/// Page ordering by chat id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatOrder {
    #[default]
    Asc,
    Desc,
}

impl ChatOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatOrder::Asc => "asc",
            ChatOrder::Desc => "desc",
        }
    }
}

/// A chat room the user participates in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub member_count: u32,
    pub image_url: Option<String>,
    pub chat_type: ChatType,
}

impl Chat {
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| TalkError::Decode("chat entry is not an object".into()))?;
        let id = match obj.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(TalkError::Decode("chat entry has no id".into())),
        };
        Ok(Self {
            id,
            title: obj.get("title").and_then(Value::as_str).unwrap_or_default().to_string(),
            member_count: obj
                .get("member_count")
                .and_then(Value::as_u64)
                .map(|n| n.min(u32::MAX as u64) as u32)
                .unwrap_or(0),
            image_url: obj
                .get("image_url")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            chat_type: obj
                .get("chat_type")
                .and_then(Value::as_str)
                .map(ChatType::parse)
                .unwrap_or(ChatType::Unknown),
        })
    }
}

/// Opaque pagination cursor for chat-list retrieval.
///
/// A fresh context addresses the first page. Later contexts come only from
/// [`ChatPage::next`], which starts strictly after the last chat returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatContext {
    from_id: Option<String>,
    limit: Option<u32>,
    order: ChatOrder,
    chat_type: Option<ChatType>,
}

impl ChatContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_order(mut self, order: ChatOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_chat_type(mut self, chat_type: ChatType) -> Self {
        self.chat_type = Some(chat_type);
        self
    }

    pub(crate) fn is_first_page(&self) -> bool {
        self.from_id.is_none()
    }

    /// Query parameters for the chat-list endpoint. A requested limit
    /// outside `1..=max_limit` is rejected.
    #[doc(hidden)]
    pub fn to_query(&self, default_limit: u32, max_limit: u32) -> Result<Vec<(String, String)>> {
        let limit = self.limit.unwrap_or(default_limit);
        if limit == 0 || limit > max_limit {
            return Err(TalkError::Validation(format!(
                "chat list limit {limit} outside 1..={max_limit}"
            )));
        }
        let mut query = vec![
            ("limit".to_string(), limit.to_string()),
            ("order".to_string(), self.order.as_str().to_string()),
        ];
        if let Some(from) = &self.from_id {
            query.push(("from_id".to_string(), from.clone()));
        }
        if let Some(ty) = self.chat_type {
            query.push(("chat_type".to_string(), ty.as_str().to_string()));
        }
        Ok(query)
    }

    fn after(&self, last_id: &str) -> Self {
        Self {
            from_id: Some(last_id.to_string()),
            ..self.clone()
        }
    }
}

/// One page of chats and the cursor for the page after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPage {
    pub chats: Vec<Chat>,
    pub next: ChatContext,
}

impl ChatPage {
    /// Decode a `{"chats": [...]}` response requested with `context`.
    pub fn decode(context: &ChatContext, body: &Value) -> Result<Self> {
        let entries = body
            .get("chats")
            .and_then(Value::as_array)
            .ok_or_else(|| TalkError::Decode("chat list response has no `chats` array".into()))?;
        let chats = entries.iter().map(Chat::from_value).collect::<Result<Vec<_>>>()?;
        let next = match chats.last() {
            Some(last) => context.after(&last.id),
            None => context.clone(),
        };
        Ok(Self { chats, next })
    }

    /// An empty page marks the end of the list.
    pub fn is_last(&self) -> bool {
        self.chats.is_empty()
    }
}
