//! Client layer: the connection facade, its builder and the error taxonomy.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::{Page, ServicePlanId, Token, ValidationError};
use crate::transport::http::{BoxError, HttpRequest, HttpTransport, ReqwestTransport};
use crate::transport::json::JsonConfig;
use crate::transport::paged::decode_page;
use crate::transport::response::{ResponseFailure, UnexpectedResponse, classify};

mod batches;
mod blocking;
mod callback;
mod groups;
mod inbounds;
mod paging;
#[cfg(test)]
mod test_support;

pub use blocking::{BlockingApiConnection, BlockingElements, BlockingPagedFetcher, BlockingPages};
pub use callback::{CallbackWrapper, FutureCallback};
pub use paging::{PageFuture, PagedFetcher};

/// Default XMS endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.clxcommunications.com/xms";

/// Version marker sent with every request.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

const SDK_VERSION_HEADER: &str = "x-clx-sdk-version";

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`ApiConnection`] and [`BlockingApiConnection`].
///
/// Response statuses are classified once:
/// - 400/403 with an API error body become [`XmsError::ErrorResponse`],
/// - 401 becomes [`XmsError::Unauthorized`], 404 [`XmsError::NotFound`],
/// - any other unexpected status keeps the raw response in [`XmsError::UnexpectedResponse`].
pub enum XmsError {
    /// The API rejected the request with a structured error.
    #[error("API error {code}: {text}")]
    ErrorResponse { code: String, text: String },

    /// The API gateway rejected the request with a generic bad-request body.
    #[error("bad request (status {status}): {}", .error.as_deref().unwrap_or("no details"))]
    BadRequest {
        status: u16,
        error: Option<String>,
        path: Option<String>,
        timestamp: Option<String>,
    },

    /// Missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The addressed resource does not exist.
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error(transparent)]
    UnexpectedResponse(UnexpectedResponse),

    /// Failure inside the request pipeline, such as an I/O error or a body
    /// that is not valid JSON.
    #[error("request failed: {0}")]
    Concurrent(#[source] BoxError),

    /// A blocking call was cancelled before the response arrived.
    #[error("interrupted while waiting for a response")]
    Interrupted,

    /// The connection owns its HTTP client and it is not started, or already closed.
    #[error("HTTP client is not running")]
    NotRunning,

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The internal HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The runtime for blocking calls could not be created.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl XmsError {
    pub(crate) fn concurrent(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Concurrent(Box::new(err))
    }

    /// The API error code, for [`XmsError::ErrorResponse`].
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::ErrorResponse { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<ResponseFailure> for XmsError {
    fn from(value: ResponseFailure) -> Self {
        match value {
            ResponseFailure::ErrorResponse(error) => Self::ErrorResponse {
                code: error.code,
                text: error.text,
            },
            ResponseFailure::BadRequest(error) => Self::BadRequest {
                status: error.status,
                error: error.error,
                path: error.path,
                timestamp: error.timestamp,
            },
            ResponseFailure::Unauthorized => Self::Unauthorized,
            ResponseFailure::NotFound { path } => Self::NotFound { path },
            ResponseFailure::Unexpected(response) => Self::UnexpectedResponse(response),
            ResponseFailure::Malformed(err) => Self::concurrent(err),
        }
    }
}

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const CLOSED: u8 = 2;

#[derive(Debug)]
struct Lifecycle {
    owns_http: bool,
    state: AtomicU8,
}

impl Lifecycle {
    fn owned() -> Self {
        Self {
            owns_http: true,
            state: AtomicU8::new(IDLE),
        }
    }

    fn external() -> Self {
        Self {
            owns_http: false,
            state: AtomicU8::new(RUNNING),
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`ApiConnection`].
///
/// `timeout` and `user_agent` configure the internal HTTP client and are
/// ignored when an external client is supplied with [`ApiConnectionBuilder::http_client`].
pub struct ApiConnectionBuilder {
    service_plan_id: ServicePlanId,
    token: Token,
    endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    pretty_print_json: bool,
    http_client: Option<reqwest::Client>,
    callback_wrapper: CallbackWrapper,
}

impl ApiConnectionBuilder {
    /// Create a builder with the default endpoint.
    pub fn new(service_plan_id: ServicePlanId, token: Token) -> Self {
        Self {
            service_plan_id,
            token,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
            pretty_print_json: false,
            http_client: None,
            callback_wrapper: CallbackWrapper::default(),
        }
    }

    /// Override the base URL. It must be an `http` or `https` URL without
    /// query or fragment.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Pretty-print request bodies.
    pub fn pretty_print_json(mut self, enabled: bool) -> Self {
        self.pretty_print_json = enabled;
        self
    }

    /// Use an existing HTTP client. The connection never starts or closes it.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn callback_wrapper(mut self, wrapper: CallbackWrapper) -> Self {
        self.callback_wrapper = wrapper;
        self
    }

    /// Build a connection. An internally created HTTP client must be started
    /// with [`ApiConnection::start`] before use.
    pub fn build(self) -> Result<ApiConnection, XmsError> {
        let endpoint = parse_endpoint(&self.endpoint)?;

        let (client, lifecycle) = match self.http_client {
            Some(client) => (client, Lifecycle::external()),
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                let client = builder.build().map_err(XmsError::HttpClient)?;
                (client, Lifecycle::owned())
            }
        };

        Ok(ApiConnection {
            service_plan_id: self.service_plan_id,
            token: self.token,
            endpoint,
            json: JsonConfig::new(self.pretty_print_json),
            callback_wrapper: self.callback_wrapper,
            http: Arc::new(ReqwestTransport::new(client)),
            lifecycle: Arc::new(lifecycle),
        })
    }

    /// Build and start a connection.
    pub fn start(self) -> Result<ApiConnection, XmsError> {
        let connection = self.build()?;
        connection.start();
        Ok(connection)
    }

    /// Build a started connection wrapped for blocking use.
    pub fn build_blocking(self) -> Result<BlockingApiConnection, XmsError> {
        BlockingApiConnection::new(self.start()?)
    }
}

fn parse_endpoint(input: &str) -> Result<Url, ValidationError> {
    let invalid = |reason| ValidationError::InvalidEndpoint {
        input: input.to_owned(),
        reason,
    };

    let url = Url::parse(input).map_err(|_| invalid("not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.query().is_some() {
        return Err(invalid("must not have a query"));
    }
    if url.fragment().is_some() {
        return Err(invalid("must not have a fragment"));
    }
    Ok(url)
}

#[derive(Clone)]
/// Asynchronous XMS connection.
///
/// Cloning is cheap; clones share the HTTP client and its lifecycle. Every
/// request is sent to `{endpoint}/v1/{service_plan_id}/...` with a bearer
/// token, `Accept: application/json` and an SDK version header.
pub struct ApiConnection {
    service_plan_id: ServicePlanId,
    token: Token,
    endpoint: Url,
    json: JsonConfig,
    callback_wrapper: CallbackWrapper,
    http: Arc<dyn HttpTransport>,
    lifecycle: Arc<Lifecycle>,
}

impl std::fmt::Debug for ApiConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConnection")
            .field("service_plan_id", &self.service_plan_id)
            .field("token", &self.token)
            .field("endpoint", &self.endpoint.as_str())
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

impl ApiConnection {
    /// Start building a connection.
    pub fn builder(service_plan_id: ServicePlanId, token: Token) -> ApiConnectionBuilder {
        ApiConnectionBuilder::new(service_plan_id, token)
    }

    /// Start the internal HTTP client. Does nothing for an external client.
    pub fn start(&self) {
        if !self.lifecycle.owns_http {
            tracing::debug!("not starting HTTP client since it was given externally");
            return;
        }
        match self.lifecycle.state.compare_exchange(
            IDLE,
            RUNNING,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => tracing::debug!("started HTTP client"),
            Err(CLOSED) => tracing::debug!("not starting HTTP client since it was closed"),
            Err(_) => {}
        }
    }

    /// Close the internal HTTP client. Does nothing for an external client.
    ///
    /// Later requests on this connection and its clones fail with
    /// [`XmsError::NotRunning`].
    pub fn close(&self) {
        if !self.lifecycle.owns_http {
            tracing::debug!("not closing HTTP client since it was given externally");
            return;
        }
        if self.lifecycle.state.swap(CLOSED, Ordering::AcqRel) != CLOSED {
            tracing::debug!("closed HTTP client");
        }
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.state.load(Ordering::Acquire) == RUNNING
    }

    pub fn service_plan_id(&self) -> &ServicePlanId {
        &self.service_plan_id
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn pretty_print_json(&self) -> bool {
        self.json.pretty_print()
    }

    pub fn callback_wrapper(&self) -> CallbackWrapper {
        self.callback_wrapper
    }

    fn url(&self, segments: &[&str], query: &[(String, String)]) -> Result<Url, XmsError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| ValidationError::InvalidEndpoint {
                input: self.endpoint.to_string(),
                reason: "cannot be a base URL",
            })?
            .pop_if_empty()
            .push("v1")
            .push(self.service_plan_id.as_str())
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn headers(&self, has_body: bool) -> Result<HeaderMap, XmsError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token.as_str())).map_err(
            |_| ValidationError::InvalidHeaderValue {
                field: Token::FIELD,
            },
        )?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(SDK_VERSION_HEADER),
            HeaderValue::from_static(SDK_VERSION),
        );
        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        Ok(headers)
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, XmsError> {
        self.json.encode(value).map_err(XmsError::concurrent)
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        query: Vec<(String, String)>,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, XmsError> {
        if !self.is_running() {
            return Err(XmsError::NotRunning);
        }

        let url = self.url(segments, &query)?;
        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_owned(),
        };
        let request = HttpRequest {
            method,
            url,
            headers: self.headers(body.is_some())?,
            body,
        };

        tracing::debug!(method = %request.method, path = %path, "sending request");
        let response = self
            .http
            .execute(request)
            .await
            .map_err(XmsError::Concurrent)?;
        tracing::debug!(status = response.status, path = %path, "received response");

        classify(response, &path).map_err(XmsError::from)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: Vec<(String, String)>,
        body: Option<Vec<u8>>,
    ) -> Result<T, XmsError> {
        let response = self.send(method, segments, query, body).await?;
        self.json.decode(&response).map_err(XmsError::concurrent)
    }

    /// Send a request whose success response carries no content.
    async fn send_empty(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Vec<u8>>,
    ) -> Result<(), XmsError> {
        let response = self.send(method, segments, Vec::new(), body).await?;
        if !response.iter().all(u8::is_ascii_whitespace) {
            tracing::warn!(
                body = %String::from_utf8_lossy(&response),
                "expected empty response body"
            );
        }
        Ok(())
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: Vec<(String, String)>,
        content_field: &'static str,
    ) -> Result<Page<T>, XmsError> {
        let response = self.send(Method::GET, segments, query, None).await?;
        decode_page(&response, content_field).map_err(XmsError::concurrent)
    }
}
