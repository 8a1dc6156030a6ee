#![allow(dead_code)]

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use http::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Path prefix the stub serves under, mirroring a serving-endpoints base URL.
pub const BASE_PATH: &str = "/serving-endpoints";

/// In-process chat-completions endpoint bound to an ephemeral port.
///
/// Records every request it receives and answers with the configured reply.
#[derive(Clone)]
pub struct UpstreamStub {
    base_url: String,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
pub enum StubReply {
    Json {
        status: StatusCode,
        body: serde_json::Value,
        retry_after: Option<&'static str>,
    },
    Raw {
        status: StatusCode,
        body: &'static str,
    },
    Delayed {
        delay: Duration,
        body: serde_json::Value,
    },
}

impl StubReply {
    pub fn ok(body: serde_json::Value) -> Self {
        StubReply::Json {
            status: StatusCode::OK,
            body,
            retry_after: None,
        }
    }

    pub fn error(status: StatusCode, body: serde_json::Value) -> Self {
        StubReply::Json {
            status,
            body,
            retry_after: None,
        }
    }
}

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl UpstreamStub {
    pub async fn start(reply: StubReply) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(StubState {
            reply,
            calls: calls.clone(),
            requests: requests.clone(),
        });

        let router = Router::new()
            .route(
                &format!("{BASE_PATH}/chat/completions"),
                post(chat_completions_handler),
            )
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind upstream stub");
        let addr = listener.local_addr().expect("upstream stub local addr");
        let (tx, rx) = oneshot::channel::<()>();

        let server = axum::serve(listener, router.into_make_service());
        tokio::spawn(async move {
            tokio::select! {
                res = server => {
                    if let Err(err) = res {
                        eprintln!("Upstream stub server error: {err:?}");
                    }
                }
                _ = rx => {}
            }
        });

        UpstreamStub {
            base_url: format!("http://{}{}", addr, BASE_PATH),
            calls,
            requests,
            shutdown: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Base URL to hand to the client (without `/chat/completions`).
    pub fn url(&self) -> String {
        self.base_url.clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn take_requests(&self) -> Vec<RecordedRequest> {
        let mut guard = self.requests.lock().expect("lock stub requests");
        guard.drain(..).collect()
    }
}

impl Drop for UpstreamStub {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.shutdown.lock() {
            if let Some(tx) = guard.take() {
                let _ = tx.send(());
            }
        }
    }
}

async fn chat_completions_handler(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    if let Ok(mut guard) = state.requests.lock() {
        guard.push(RecordedRequest {
            authorization: header("authorization"),
            request_id: header("x-request-id"),
            body,
        });
    }

    match &state.reply {
        StubReply::Json {
            status,
            body,
            retry_after,
        } => {
            let mut response = (*status, Json(body.clone())).into_response();
            if let Some(value) = retry_after {
                response.headers_mut().insert(
                    http::header::RETRY_AFTER,
                    http::HeaderValue::from_static(*value),
                );
            }
            response
        }
        StubReply::Raw { status, body } => (*status, *body).into_response(),
        StubReply::Delayed { delay, body } => {
            tokio::time::sleep(*delay).await;
            Json(body.clone()).into_response()
        }
    }
}

/// A realistic completion payload as returned by a serving endpoint.
pub fn sample_completion(model: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-stub-0001",
        "object": "chat.completion",
        "created": 1713200000u64,
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 24, "completion_tokens": 12, "total_tokens": 36}
    })
}
