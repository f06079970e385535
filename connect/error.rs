use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::code::Code;
use crate::protocol::CONTENT_TYPE_JSON;

/// The error type of every RPC in this crate.
///
/// Carries one of the canonical [`Code`]s, a human readable message, and
/// optional metadata that travels as HTTP headers next to the error body.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct ConnectError {
    code: Code,
    message: String,
    metadata: HeaderMap,
}

/// JSON body of an error reply, `{"code": "...", "message": "..."}`.
#[derive(Debug, Deserialize)]
struct WireError {
    code: String,
    #[serde(default)]
    message: String,
}

impl ConnectError {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            metadata: HeaderMap::new(),
        }
    }

    pub fn canceled(message: impl Into<String>) -> Self {
        Self::new(Code::Canceled, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Code::Unknown, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(Code::DeadlineExceeded, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    pub fn resource_exhausted(message: impl Into<String>) -> Self {
        Self::new(Code::ResourceExhausted, message)
    }

    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self::new(Code::Unimplemented, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(Code::Unavailable, message)
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn metadata(&self) -> &HeaderMap {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut HeaderMap {
        &mut self.metadata
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: HeaderMap) -> Self {
        self.metadata = metadata;
        self
    }

    /// Serialises the error to its Connect JSON wire form.
    pub fn to_json(&self) -> Bytes {
        let body = if self.message.is_empty() {
            serde_json::json!({ "code": self.code.as_str() })
        } else {
            serde_json::json!({
                "code": self.code.as_str(),
                "message": self.message,
            })
        };
        Bytes::from(body.to_string())
    }

    /// Reconstructs the error a server replied with. Falls back to inferring
    /// the code from the HTTP status when the body isn't a Connect error.
    pub fn from_http_response(
        status: StatusCode,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Self {
        let error = match serde_json::from_slice::<WireError>(body) {
            | Ok(wire) => {
                match wire.code.parse::<Code>() {
                    | Ok(code) => Some(Self::new(code, wire.message)),
                    | Err(_) => None,
                }
            }
            | Err(_) => None,
        };
        let error = error.unwrap_or_else(|| {
            Self::new(
                Code::from_http_status(status),
                format!(
                    "HTTP status {}",
                    status
                        .canonical_reason()
                        .map(|r| format!("{} {r}", status.as_u16()))
                        .unwrap_or_else(|| status.as_u16().to_string())
                ),
            )
        });

        let mut metadata = headers.clone();
        metadata.remove(CONTENT_TYPE);
        metadata.remove(CONTENT_LENGTH);
        error.with_metadata(metadata)
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::deadline_exceeded(err.to_string())
        } else {
            Self::unavailable(err.to_string())
        }
    }
}

impl IntoResponse for ConnectError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();
        let body = self.to_json();
        let mut response = (status, body).into_response();
        let headers = response.headers_mut();
        for (name, value) in self.metadata.iter() {
            if name == CONTENT_TYPE || name == CONTENT_LENGTH {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }
        headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        response
    }
}

impl From<ConnectError> for tonic::Status {
    fn from(err: ConnectError) -> Self {
        tonic::Status::new(err.code.into(), err.message)
    }
}

impl From<tonic::Status> for ConnectError {
    fn from(status: tonic::Status) -> Self {
        Self::new(status.code().into(), status.message())
    }
}
