//! Receiver-object send calls kept for source compatibility.
//!
//! Each deprecated entry point resolves its receiver to a
//! `(ReceiverType, id)` pair and goes through `send_template_message`.

use crate::talk::TalkApi;
use crate::transport::Transport;
use talk_core::error::Result;
use talk_core::{Chat, ReceiverType, TemplateArgs, UserInfo};

/// Receiver addressed by object rather than by typed id.
#[derive(Debug, Clone)]
pub enum LegacyReceiver {
    User(UserInfo),
    Friend(UserInfo),
    Chat(Chat),
}

impl LegacyReceiver {
    /// Friends are addressed by UUID when the provider handed one out.
    pub fn resolve(&self) -> (ReceiverType, String) {
        match self {
            LegacyReceiver::User(user) => (ReceiverType::User, user.id.clone()),
            LegacyReceiver::Friend(user) => match &user.uuid {
                Some(uuid) => (ReceiverType::Uuid, uuid.clone()),
                None => (ReceiverType::User, user.id.clone()),
            },
            LegacyReceiver::Chat(chat) => (ReceiverType::Chat, chat.id.clone()),
        }
    }
}

impl<T: Transport + 'static> TalkApi<T> {
    #[deprecated(note = "use `send_template_message` with `ReceiverType::User`")]
    pub async fn send_message_to_user(
        &self,
        template_id: &str,
        user: &UserInfo,
        message_args: &TemplateArgs,
    ) -> Result<()> {
        self.send_to_receiver(template_id, &LegacyReceiver::User(user.clone()), message_args)
            .await
    }

    #[deprecated(note = "use `send_template_message` with `ReceiverType::Chat`")]
    pub async fn send_message_to_chat(
        &self,
        template_id: &str,
        chat: &Chat,
        message_args: &TemplateArgs,
    ) -> Result<()> {
        self.send_to_receiver(template_id, &LegacyReceiver::Chat(chat.clone()), message_args)
            .await
    }

    #[deprecated(note = "use `send_template_message`")]
    pub async fn send_message(
        &self,
        template_id: &str,
        receiver: &LegacyReceiver,
        message_args: &TemplateArgs,
    ) -> Result<()> {
        self.send_to_receiver(template_id, receiver, message_args).await
    }

    #[deprecated(note = "use `send_template_memo`")]
    pub async fn send_memo(&self, template_id: &str, message_args: &TemplateArgs) -> Result<()> {
        self.send_template_memo(template_id, message_args).await
    }

    async fn send_to_receiver(
        &self,
        template_id: &str,
        receiver: &LegacyReceiver,
        message_args: &TemplateArgs,
    ) -> Result<()> {
        let (receiver_type, receiver_id) = receiver.resolve();
        self.send_template_message(template_id, message_args, receiver_type, &receiver_id)
            .await
    }
}
