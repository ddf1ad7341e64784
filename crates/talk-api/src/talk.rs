//! Talk API dispatcher: message/memo sends, profile and chat-list reads.

use crate::http::HttpTransport;
use crate::task::SessionTask;
use crate::transport::{ApiRequest, Transport};
use serde_json::Value;
use std::sync::Arc;
use talk_core::config::{ChatListConfig, ClientConfig};
use talk_core::error::{Result, TalkError};
use talk_core::{ChatContext, ChatPage, MessageTemplate, ReceiverType, TemplateArgs, UserProfile};
use talk_session::{AuthSession, Credential};
use tracing::Instrument;
use uuid::Uuid;

pub const MESSAGE_SEND_PATH: &str = "/v2/api/talk/message/send";
pub const MEMO_SEND_PATH: &str = "/v2/api/talk/memo/send";
pub const PROFILE_PATH: &str = "/v1/user/me";
pub const CHAT_LIST_PATH: &str = "/v1/api/talk/chat/list";

/// Issues delegated calls against the session it was built with.
pub struct TalkApi<T> {
    transport: Arc<T>,
    session: Arc<AuthSession>,
    chat_list: ChatListConfig,
}

impl<T> Clone for TalkApi<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            session: self.session.clone(),
            chat_list: self.chat_list.clone(),
        }
    }
}

impl TalkApi<HttpTransport> {
    /// HTTP client for `config`, bound to `session`.
    pub fn from_config(config: &ClientConfig, session: Arc<AuthSession>) -> Result<Self> {
        let transport = HttpTransport::new(&config.api)?;
        Ok(Self::new(transport, session).with_chat_list_config(config.chat_list.clone()))
    }
}

impl<T: Transport + 'static> TalkApi<T> {
    pub fn new(transport: T, session: Arc<AuthSession>) -> Self {
        Self {
            transport: Arc::new(transport),
            session,
            chat_list: ClientConfig::default().chat_list,
        }
    }

    pub fn with_chat_list_config(mut self, chat_list: ChatListConfig) -> Self {
        self.chat_list = chat_list;
        self
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    // ========== Operations ==========

    /// Send a template message to a user, chat room or UUID.
    ///
    /// Template argument completeness is checked by the provider; a missing
    /// argument comes back as `Remote`.
    pub async fn send_template_message(
        &self,
        template_id: &str,
        args: &TemplateArgs,
        receiver_type: ReceiverType,
        receiver_id: &str,
    ) -> Result<()> {
        self.call("send_template_message", |credential| {
            require_non_empty("template id", template_id)?;
            require_non_empty("receiver id", receiver_id)?;
            Ok(ApiRequest::post(MESSAGE_SEND_PATH, credential)
                .form("template_id", template_id)
                .form("receiver_id", receiver_id)
                .form("receiver_id_type", receiver_type.as_str())
                .form("template_args", args_json(args)))
        })
        .await
        .map(|_| ())
    }

    /// Send a template message to the user's own memo chat.
    pub async fn send_template_memo(&self, template_id: &str, args: &TemplateArgs) -> Result<()> {
        self.call("send_template_memo", |credential| {
            require_non_empty("template id", template_id)?;
            Ok(ApiRequest::post(MEMO_SEND_PATH, credential)
                .form("template_id", template_id)
                .form("template_args", args_json(args)))
        })
        .await
        .map(|_| ())
    }

    /// Fetch the logged-in user's profile. `secure_resources` asks for https image URLs.
    pub async fn fetch_profile(&self, secure_resources: bool) -> Result<UserProfile> {
        let body = self
            .call("fetch_profile", |credential| {
                Ok(ApiRequest::get(PROFILE_PATH, credential)
                    .query("secure_resource", secure_resources.to_string()))
            })
            .await?;
        if !body.is_object() {
            return Err(TalkError::Decode(format!("profile body is not an object: {body}")));
        }
        Ok(UserProfile::from_value(&body))
    }

    /// Fetch one page of chat rooms starting at `context`.
    pub async fn fetch_chat_list(&self, context: &ChatContext) -> Result<ChatPage> {
        let body = self
            .call("fetch_chat_list", |credential| {
                let query =
                    context.to_query(self.chat_list.default_limit, self.chat_list.max_limit)?;
                let mut request = ApiRequest::get(CHAT_LIST_PATH, credential);
                for (key, value) in query {
                    request = request.query(key, value);
                }
                Ok(request)
            })
            .await?;
        ChatPage::decode(context, &body)
    }

    // ========== Spawned Tasks ==========

    /// Runs [`send_template_message`](Self::send_template_message) on the
    /// current tokio runtime. Called outside a runtime, the returned task
    /// settles immediately with `TalkError::Other` and no request is made;
    /// the same holds for every `spawn_*` method.
    pub fn spawn_send_template_message(
        &self,
        template: MessageTemplate,
        receiver_type: ReceiverType,
        receiver_id: impl Into<String>,
    ) -> SessionTask<()> {
        let api = self.clone();
        let receiver_id = receiver_id.into();
        SessionTask::spawn(async move {
            api.send_template_message(&template.id, &template.args, receiver_type, &receiver_id)
                .await
        })
    }

    /// Runs [`send_template_memo`](Self::send_template_memo) on the current runtime.
    pub fn spawn_send_template_memo(&self, template: MessageTemplate) -> SessionTask<()> {
        let api = self.clone();
        SessionTask::spawn(async move { api.send_template_memo(&template.id, &template.args).await })
    }

    /// Runs [`fetch_profile`](Self::fetch_profile) on the current runtime.
    pub fn spawn_fetch_profile(&self, secure_resources: bool) -> SessionTask<UserProfile> {
        let api = self.clone();
        SessionTask::spawn(async move { api.fetch_profile(secure_resources).await })
    }

    /// Runs [`fetch_chat_list`](Self::fetch_chat_list) on the current runtime.
    pub fn spawn_fetch_chat_list(&self, context: ChatContext) -> SessionTask<ChatPage> {
        let api = self.clone();
        SessionTask::spawn(async move { api.fetch_chat_list(&context).await })
    }

    // ========== Dispatch ==========

    /// Gate on the session, build one request, send it once, map the outcome.
    async fn call<F>(&self, capability: &'static str, build: F) -> Result<Value>
    where
        F: FnOnce(&Credential) -> Result<ApiRequest>,
    {
        let task_id = Uuid::new_v4();
        let span = tracing::info_span!("talk_task", %task_id, capability);
        async move {
            let credential = self.session.credential().inspect_err(|_| {
                tracing::debug!("rejected without a valid session");
            })?;
            let request = build(&*credential)?;
            tracing::debug!(method = ?request.method, path = %request.path, "dispatching");

            let outcome = self
                .transport
                .execute(request)
                .await
                .and_then(|response| response.into_result());
            if let Err(e) = &outcome {
                if e.is_auth() {
                    self.session.invalidate_credential(&credential);
                }
                tracing::warn!(error = %e, "delegated call failed");
            }
            outcome
        }
        .instrument(span)
        .await
    }
}

fn require_non_empty(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TalkError::Validation(format!("{what} is empty")));
    }
    Ok(())
}

fn args_json(args: &TemplateArgs) -> String {
    Value::Object(args.clone()).to_string()
}
