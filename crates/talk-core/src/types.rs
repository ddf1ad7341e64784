use serde::{Deserialize, Serialize};
use std::fmt;

/// Key/value arguments filling a provider-side message template.
pub type TemplateArgs = serde_json::Map<String, serde_json::Value>;

/// Kind of identifier a template message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiverType {
    User,
    Chat,
    Uuid,
}

impl ReceiverType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiverType::User => "user",
            ReceiverType::Chat => "chat",
            ReceiverType::Uuid => "uuid",
        }
    }
}

impl fmt::Display for ReceiverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a provider-defined template plus its arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: String,
    #[serde(default)]
    pub args: TemplateArgs,
}

impl MessageTemplate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            args: TemplateArgs::new(),
        }
    }

    pub fn arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Arguments encoded as the JSON string the send endpoints expect.
    pub fn args_json(&self) -> String {
        serde_json::Value::Object(self.args.clone()).to_string()
    }
}

/// Minimal addressable user, as handed out by friend lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    #[serde(default)]
    pub uuid: Option<String>,
}

impl UserInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), uuid: None }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }
}
