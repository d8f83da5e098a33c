use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use reqwest::header::HeaderMap;

use crate::client::{ApiConnection, CallbackWrapper, Lifecycle};
use crate::domain::{ServicePlanId, Token};
use crate::transport::http::{BoxError, BoxFuture, HttpRequest, HttpResponse, HttpTransport};
use crate::transport::json::JsonConfig;

#[derive(Debug, Clone)]
enum Reply {
    Respond(u16, String),
    Fail(String),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    replies: VecDeque<Reply>,
    fallback: Option<Reply>,
}

impl FakeTransport {
    /// Answer every request with the same response.
    pub(crate) fn new(status: u16, body: impl Into<String>) -> Self {
        let transport = Self::default();
        transport.lock().fallback = Some(Reply::Respond(status, body.into()));
        transport
    }

    /// Answer requests in order; requests past the end fail.
    pub(crate) fn sequence<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = (u16, S)>,
        S: Into<String>,
    {
        let transport = Self::default();
        transport.lock().replies = replies
            .into_iter()
            .map(|(status, body)| Reply::Respond(status, body.into()))
            .collect();
        transport
    }

    pub(crate) fn failing(message: impl Into<String>) -> Self {
        let transport = Self::default();
        transport.lock().fallback = Some(Reply::Fail(message.into()));
        transport
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.lock().requests.last().cloned()
    }

    /// Path and query of the last request, relative to the host.
    pub(crate) fn last_target(&self) -> Option<String> {
        self.last_request().map(|request| match request.url.query() {
            Some(query) => format!("{}?{}", request.url.path(), query),
            None => request.url.path().to_owned(),
        })
    }

    /// Body of the last request parsed as JSON.
    pub(crate) fn last_json(&self) -> Option<serde_json::Value> {
        let body = self.last_request()?.body?;
        serde_json::from_slice(&body).ok()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeTransportState> {
        self.state.lock().unwrap()
    }
}

impl HttpTransport for FakeTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        let reply = {
            let mut state = self.lock();
            state.requests.push(request);
            state.replies.pop_front().or_else(|| state.fallback.clone())
        };

        Box::pin(async move {
            match reply {
                Some(Reply::Respond(status, body)) => Ok(HttpResponse {
                    status,
                    headers: HeaderMap::new(),
                    body: body.into_bytes(),
                }),
                Some(Reply::Fail(message)) => Err(std::io::Error::other(message).into()),
                None => Err(std::io::Error::other("no more fake replies").into()),
            }
        })
    }
}

/// A running connection to `https://example.invalid/xms` for plan `plan`.
pub(crate) fn make_connection(transport: FakeTransport) -> ApiConnection {
    ApiConnection {
        service_plan_id: ServicePlanId::new("plan").unwrap(),
        token: Token::new("tok").unwrap(),
        endpoint: "https://example.invalid/xms".parse().unwrap(),
        json: JsonConfig::default(),
        callback_wrapper: CallbackWrapper::default(),
        http: Arc::new(transport),
        lifecycle: Arc::new(Lifecycle::external()),
    }
}
