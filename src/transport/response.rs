//! Response classification, applied once to every response.

use std::borrow::Cow;
use std::fmt;

use reqwest::header::HeaderMap;

use crate::domain::{ApiError, BadRequestError};
use crate::transport::http::HttpResponse;

#[derive(Clone)]
/// A response the client does not know how to interpret.
///
/// Status, headers and the fully buffered body are kept for inspection.
pub struct UnexpectedResponse {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl UnexpectedResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body decoded as UTF-8, with invalid sequences replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

impl fmt::Debug for UnexpectedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnexpectedResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body_text())
            .finish()
    }
}

impl fmt::Display for UnexpectedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected response with status {}", self.status)
    }
}

impl std::error::Error for UnexpectedResponse {}

#[derive(Debug)]
pub(crate) enum ResponseFailure {
    ErrorResponse(ApiError),
    BadRequest(BadRequestError),
    Unauthorized,
    NotFound { path: String },
    Unexpected(UnexpectedResponse),
    Malformed(serde_json::Error),
}

/// Split a response into a success body or a typed failure.
///
/// `path` is the request path (and query) reported for 404 responses.
pub(crate) fn classify(response: HttpResponse, path: &str) -> Result<Vec<u8>, ResponseFailure> {
    match response.status {
        200..=202 => Ok(response.body),
        400 | 403 => Err(classify_error_body(&response.body)),
        401 => Err(ResponseFailure::Unauthorized),
        404 => Err(ResponseFailure::NotFound {
            path: path.to_owned(),
        }),
        status => Err(ResponseFailure::Unexpected(UnexpectedResponse {
            status,
            headers: response.headers,
            body: response.body,
        })),
    }
}

fn classify_error_body(body: &[u8]) -> ResponseFailure {
    match serde_json::from_slice::<ApiError>(body) {
        Ok(error) => ResponseFailure::ErrorResponse(error),
        Err(err) => match serde_json::from_slice::<BadRequestError>(body) {
            Ok(error) => ResponseFailure::BadRequest(error),
            Err(_) => ResponseFailure::Malformed(err),
        },
    }
}
