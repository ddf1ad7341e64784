//! `reqwest`-backed transport. One HTTP exchange per request, no retries.

use crate::transport::{ApiRequest, ApiResponse, HttpMethod, Transport};
use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client};
use serde_json::Value;
use std::time::Duration;
use talk_core::config::ApiConfig;
use talk_core::error::{Result, TalkError};

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url).form(&request.form),
        };
        let response = builder
            .query(&request.query)
            .header(AUTHORIZATION, request.authorization())
            .send()
            .await
            .map_err(|e| TalkError::Network(format!("{} {url}: {e}", method_name(request.method))))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TalkError::Network(format!("reading response from {url}: {e}")))?;
        tracing::debug!(status, path = %request.path, bytes = text.len(), "provider responded");

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(ApiResponse { status, body })
    }
}

fn method_name(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "GET",
        HttpMethod::Post => "POST",
    }
}
