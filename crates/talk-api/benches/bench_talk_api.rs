use async_trait::async_trait;
use chrono::Duration;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use std::sync::Arc;
use talk_api::{ApiRequest, ApiResponse, TalkApi, Transport};
use talk_core::error::Result;
use talk_core::{ChatContext, MessageTemplate, ReceiverType};
use talk_session::{AuthSession, TokenGrant};

struct EchoTransport;

#[async_trait]
impl Transport for EchoTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        Ok(ApiResponse::ok(json!({
            "id": 1,
            "chats": [],
            "path": request.path,
        })))
    }
}

fn session() -> Arc<AuthSession> {
    let session = Arc::new(AuthSession::new());
    session
        .open(TokenGrant::expiring_in("bench-token", Duration::hours(1)))
        .unwrap();
    session
}

fn bench_request_build(c: &mut Criterion) {
    let session = session();
    let credential = session.credential().unwrap();
    let template = MessageTemplate::new("T1").arg("name", "bench").arg("count", 3);
    c.bench_function("build_send_request_1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                black_box(
                    ApiRequest::post("/v2/api/talk/message/send", &credential)
                        .form("template_id", template.id.as_str())
                        .form("receiver_id_type", ReceiverType::Chat.as_str())
                        .form("template_args", template.args_json()),
                );
            }
        })
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let api = TalkApi::new(EchoTransport, session());
    let template = MessageTemplate::new("T1").arg("name", "bench");

    c.bench_function("dispatch_fetch_profile", |b| {
        b.iter(|| black_box(rt.block_on(api.fetch_profile(true)).unwrap()))
    });
    c.bench_function("dispatch_send_message", |b| {
        b.iter(|| {
            rt.block_on(api.send_template_message(&template.id, &template.args, ReceiverType::User, "1"))
                .unwrap()
        })
    });
    c.bench_function("dispatch_chat_list", |b| {
        let ctx = ChatContext::new();
        b.iter(|| black_box(rt.block_on(api.fetch_chat_list(&ctx)).unwrap()))
    });
}

criterion_group!(benches, bench_request_build, bench_dispatch);
criterion_main!(benches);
