//! End-to-end tests of `HttpTransport` against a local fake provider.

use axum::{
    extract::{Form, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use talk_api::{ApiRequest, HttpTransport, TalkApi, Transport};
use talk_core::{ChatContext, ClientConfig, ErrorKind, MessageTemplate, ReceiverType, TemplateArgs};
use talk_session::{AuthSession, TokenGrant};

const TOKEN: &str = "tok-http";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn rejected() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"code": -401, "msg": "this access token does not exist"})),
    )
}

async fn me(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !authorized(&headers) {
        return rejected();
    }
    let scheme = if q.get("secure_resource").map(String::as_str) == Some("true") {
        "https"
    } else {
        "http"
    };
    (
        StatusCode::OK,
        Json(json!({
            "id": 555,
            "has_signed_up": true,
            "properties": {
                "nickname": "Muzi",
                "profile_image": format!("{scheme}://img.example.com/p.jpg"),
                "thumbnail_image": format!("{scheme}://img.example.com/t.jpg")
            }
        })),
    )
}

async fn message_send(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> impl IntoResponse {
    if !authorized(&headers) {
        return rejected();
    }
    match form.get("template_args").map(String::as_str) {
        Some("{}") | None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": -2, "msg": "required template argument missing"})),
        ),
        Some(_) if form.get("receiver_id_type").map(String::as_str) == Some("chat") => {
            (StatusCode::FORBIDDEN, Json(json!({"code": -5, "msg": "no permission"})))
        }
        Some(_) => (StatusCode::OK, Json(json!({"result_code": 0}))),
    }
}

async fn memo_send(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return rejected();
    }
    (StatusCode::OK, Json(json!({"result_code": 0})))
}

async fn chat_list(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !authorized(&headers) {
        return rejected();
    }
    let ids: Vec<u64> = (1..=5).collect();
    let limit: usize = q.get("limit").and_then(|l| l.parse().ok()).unwrap_or(30);
    let start = q
        .get("from_id")
        .and_then(|from| ids.iter().position(|id| &id.to_string() == from))
        .map(|p| p + 1)
        .unwrap_or(0);
    let chats: Vec<_> = ids
        .iter()
        .skip(start)
        .take(limit)
        .map(|id| json!({"id": id, "title": format!("room {id}"), "member_count": 4, "chat_type": "open_multi"}))
        .collect();
    (StatusCode::OK, Json(json!({ "chats": chats })))
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

fn provider() -> Router {
    Router::new()
        .route("/v1/user/me", get(me))
        .route("/v2/api/talk/message/send", post(message_send))
        .route("/v2/api/talk/memo/send", post(memo_send))
        .route("/v1/api/talk/chat/list", get(chat_list))
        .route("/broken", get(broken))
}

async fn spawn_provider() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, provider()).await.unwrap();
    });
    format!("http://{addr}")
}

fn session_with(token: &str) -> Arc<AuthSession> {
    let session = Arc::new(AuthSession::new());
    session
        .open(TokenGrant::expiring_in(token, Duration::hours(1)))
        .unwrap();
    session
}

async fn client() -> (TalkApi<HttpTransport>, Arc<AuthSession>) {
    let base = spawn_provider().await;
    let config = ClientConfig::default().with_base_url(base).with_timeout_secs(5);
    let session = session_with(TOKEN);
    (TalkApi::from_config(&config, session.clone()).unwrap(), session)
}

// ========== Profile ==========

#[tokio::test]
async fn test_http_fetch_profile() {
    let (api, _) = client().await;
    let secure = api.fetch_profile(true).await.unwrap();
    assert_eq!(secure.id(), "555");
    assert_eq!(secure.nickname(), "Muzi");
    assert_eq!(secure.profile_image(), Some("https://img.example.com/p.jpg"));
    assert_eq!(secure.email(), None);
    assert_eq!(secure.property("has_signed_up"), Some(&json!(true)));

    let plain = api.fetch_profile(false).await.unwrap();
    assert_eq!(plain.thumbnail_image(), Some("http://img.example.com/t.jpg"));
}

#[tokio::test]
async fn test_http_rejected_token_closes_session() {
    let base = spawn_provider().await;
    let config = ClientConfig::default().with_base_url(base);
    let session = session_with("stale-token");
    let api = TalkApi::from_config(&config, session.clone()).unwrap();

    let err = api.fetch_profile(true).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(!session.is_valid());
}

// ========== Messages ==========

#[tokio::test]
async fn test_http_send_message_outcomes() {
    let (api, _) = client().await;

    let missing = api
        .send_template_message("T1", &TemplateArgs::new(), ReceiverType::Chat, "C1")
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::Remote);

    let template = MessageTemplate::new("T1").arg("name", "Muzi");
    let denied = api
        .send_template_message(&template.id, &template.args, ReceiverType::Chat, "C1")
        .await
        .unwrap_err();
    assert_eq!(denied.kind(), ErrorKind::Permission);

    api.send_template_message(&template.id, &template.args, ReceiverType::User, "42")
        .await
        .unwrap();
    api.send_template_memo(&template.id, &template.args).await.unwrap();
}

// ========== Chat List ==========

#[tokio::test]
async fn test_http_chat_list_walk() {
    let (api, _) = client().await;
    let mut context = ChatContext::new().with_limit(2);
    let mut ids = Vec::new();
    loop {
        let page = api.fetch_chat_list(&context).await.unwrap();
        if page.is_last() {
            break;
        }
        ids.extend(page.chats.iter().map(|c| c.id.clone()));
        context = page.next;
    }
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
}

// ========== Transport Edges ==========

#[tokio::test]
async fn test_http_non_json_error_body() {
    let base = spawn_provider().await;
    let transport = HttpTransport::new(&ClientConfig::default().with_base_url(base).api).unwrap();
    let session = session_with(TOKEN);
    let credential = session.credential().unwrap();

    let response = transport.execute(ApiRequest::get("/broken", &credential)).await.unwrap();
    assert_eq!(response.status, 500);
    assert_eq!(response.body, json!("upstream exploded"));
    match response.into_result() {
        Err(talk_core::TalkError::Remote { message, .. }) => assert_eq!(message, "upstream exploded"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_http_connection_refused_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::default()
        .with_base_url(format!("http://{addr}"))
        .with_timeout_secs(2);
    let session = session_with(TOKEN);
    let api = TalkApi::from_config(&config, session.clone()).unwrap();
    let err = api.fetch_profile(true).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(session.is_valid());
}

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let transport = HttpTransport::new(&ClientConfig::default().with_base_url("http://host:1/").api).unwrap();
    assert_eq!(transport.base_url(), "http://host:1");
}
