use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use talk_core::error::{Result, TalkError};
use talk_session::Credential;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One logical provider request: endpoint, parameters and bearer token.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    authorization: String,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>, credential: &Credential) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            form: Vec::new(),
            authorization: credential.bearer(),
        }
    }

    pub fn get(path: impl Into<String>, credential: &Credential) -> Self {
        Self::new(HttpMethod::Get, path, credential)
    }

    pub fn post(path: impl Into<String>, credential: &Credential) -> Self {
        Self::new(HttpMethod::Post, path, credential)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    /// `Authorization` header value.
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        lookup(&self.query, key)
    }

    pub fn form_value(&self, key: &str) -> Option<&str> {
        lookup(&self.form, key)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}

/// Status plus decoded body. Non-JSON bodies are kept as a JSON string.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body on success, otherwise the provider error mapped onto the taxonomy.
    pub fn into_result(self) -> Result<Value> {
        let code = self.body.get("code").and_then(Value::as_i64).filter(|c| *c < 0);
        if self.is_success() && code.is_none() {
            return Ok(self.body);
        }
        let message = match &self.body {
            Value::String(text) => text.clone(),
            body => body
                .get("msg")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", self.status)),
        };
        Err(TalkError::from_provider(self.status, code, message))
    }
}

/// Sends one request and returns the raw response. Transport failures
/// (no response at all) must be reported as `TalkError::Network`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        (**self).execute(request).await
    }
}
