use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::BytesRejection;
use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::routing::{post, MethodRouter};
use bytes::Bytes;
use http::header::{
    HeaderName,
    ACCEPT_ENCODING,
    CONTENT_ENCODING,
    CONTENT_TYPE,
};
use http::{HeaderMap, HeaderValue, StatusCode};
use tracing::{debug, warn};

use crate::codec::{Codec, RpcMessage};
use crate::compression::Compression;
use crate::error::ConnectError;
use crate::protocol::{
    parse_timeout,
    trailers_to_headers,
    validate_protocol_version,
    PROTOCOL_VERSION_HEADER,
    TIMEOUT_HEADER,
};
use crate::request::{Request, Response};
use crate::Code;

/// Settings shared by every procedure of a registered service.
///
/// By default handlers accept JSON and binary protobuf, understand gzip,
/// compress replies of at least 1KiB when the client accepts it, and refuse
/// bodies over 4MiB.
#[must_use]
#[derive(Debug, Clone)]
pub struct HandlerOptions {
    compressions: Vec<Compression>,
    compress_min_bytes: usize,
    read_max_bytes: usize,
    require_protocol_header: bool,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            compressions: vec![Compression::Gzip],
            compress_min_bytes: 1024,
            read_max_bytes: 4 * 1024 * 1024,
            require_protocol_header: false,
        }
    }
}

impl HandlerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodings supported for request bodies and offered for replies.
    pub fn compressions(mut self, compressions: Vec<Compression>) -> Self {
        self.compressions = compressions;
        self
    }

    pub fn compress_min_bytes(mut self, bytes: usize) -> Self {
        self.compress_min_bytes = bytes;
        self
    }

    pub fn read_max_bytes(mut self, bytes: usize) -> Self {
        self.read_max_bytes = bytes;
        self
    }

    /// Reject requests without a `connect-protocol-version` header.
    pub fn require_protocol_header(mut self, require: bool) -> Self {
        self.require_protocol_header = require;
        self
    }
}

/// Adapts a unary handler function into an axum POST route.
///
/// The adapter negotiates the codec from `content-type`, decompresses and
/// decodes the body, and only then invokes `handler`; malformed requests
/// never reach it.
pub fn unary_handler<Req, Res, F, Fut>(
    procedure: &'static str,
    handler: F,
    options: Arc<HandlerOptions>,
) -> MethodRouter
where
    Req: RpcMessage,
    Res: RpcMessage,
    F: Fn(Request<Req>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<Response<Res>, ConnectError>> + Send + 'static,
{
    let limit = options.read_max_bytes;
    post(
        move |headers: HeaderMap, body: Result<Bytes, BytesRejection>| {
            let handler = handler.clone();
            let options = options.clone();
            async move {
                handle_unary(procedure, handler, &options, headers, body).await
            }
        },
    )
    .layer(DefaultBodyLimit::max(limit))
}

async fn handle_unary<Req, Res, F, Fut>(
    procedure: &'static str,
    handler: F,
    options: &HandlerOptions,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> HttpResponse
where
    Req: RpcMessage,
    Res: RpcMessage,
    F: Fn(Request<Req>) -> Fut,
    Fut: Future<Output = Result<Response<Res>, ConnectError>>,
{
    let codec = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(Codec::from_content_type);
    let Some(codec) = codec else {
        warn!(
            procedure,
            content_type = ?headers.get(CONTENT_TYPE),
            "Rejecting request with unsupported content-type"
        );
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            [(
                HeaderName::from_static("accept-post"),
                HeaderValue::from_static(ACCEPT_POST),
            )],
        )
            .into_response();
    };

    debug!(procedure, codec = codec.name(), "Handling unary request");
    match serve_unary(procedure, handler, options, codec, headers, body).await {
        | Ok(response) => response,
        | Err(err) => {
            match err.code() {
                | Code::Internal | Code::Unknown | Code::DataLoss => {
                    warn!(
                        procedure,
                        code = %err.code(),
                        message = err.message(),
                        "Unary request failed"
                    );
                }
                | _ => {
                    debug!(
                        procedure,
                        code = %err.code(),
                        message = err.message(),
                        "Unary request failed"
                    );
                }
            }
            err.into_response()
        }
    }
}

const ACCEPT_POST: &str = "application/json, application/proto";

async fn serve_unary<Req, Res, F, Fut>(
    procedure: &'static str,
    handler: F,
    options: &HandlerOptions,
    codec: Codec,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<HttpResponse, ConnectError>
where
    Req: RpcMessage,
    Res: RpcMessage,
    F: Fn(Request<Req>) -> Fut,
    Fut: Future<Output = Result<Response<Res>, ConnectError>>,
{
    validate_protocol_version(&headers)?;
    if options.require_protocol_header
        && headers.get(PROTOCOL_VERSION_HEADER).is_none()
    {
        return Err(ConnectError::invalid_argument(format!(
            "missing required header: set {PROTOCOL_VERSION_HEADER} to \"1\""
        )));
    }

    let timeout = headers.get(TIMEOUT_HEADER).map(parse_timeout).transpose()?;

    let body = body.map_err(|rejection| {
        let message = rejection.to_string();
        if rejection.into_response().status() == StatusCode::PAYLOAD_TOO_LARGE {
            ConnectError::resource_exhausted(format!(
                "request message is larger than configured max {}",
                options.read_max_bytes
            ))
        } else {
            ConnectError::invalid_argument(format!(
                "read request body: {message}"
            ))
        }
    })?;

    let compression = match headers.get(CONTENT_ENCODING) {
        | None => Compression::Identity,
        | Some(value) => {
            value
                .to_str()
                .ok()
                .and_then(Compression::from_name)
                .filter(|c| {
                    *c == Compression::Identity
                        || options.compressions.contains(c)
                })
                .ok_or_else(|| {
                    ConnectError::unimplemented(format!(
                        "unknown compression {value:?}: supported encodings \
                         are {}",
                        supported_names(&options.compressions)
                    ))
                })?
        }
    };

    if body.len() > options.read_max_bytes {
        return Err(ConnectError::resource_exhausted(format!(
            "request message size {} is larger than configured max {}",
            body.len(),
            options.read_max_bytes
        )));
    }
    let body = compression.decompress(body, options.read_max_bytes)?;
    let message = codec.decode::<Req>(&body)?;

    let accept_encoding = headers
        .get(ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let request = Request::from_parts(message, headers, timeout);
    let response = match timeout {
        | Some(timeout) => {
            tokio::time::timeout(timeout, handler(request))
                .await
                .map_err(|_| {
                    ConnectError::deadline_exceeded(format!(
                        "{procedure} did not complete within {timeout:?}"
                    ))
                })??
        }
        | None => handler(request).await?,
    };

    let (mut response_headers, message, trailers) = response.into_parts();
    let mut body = codec.encode(&message)?;
    let compression = accept_encoding.as_deref().and_then(|accept| {
        Compression::negotiate(accept, &options.compressions)
    });
    if let Some(compression) = compression {
        if body.len() >= options.compress_min_bytes {
            body = compression.compress(&body)?;
            response_headers.insert(
                CONTENT_ENCODING,
                HeaderValue::from_static(compression.name()),
            );
        }
    }
    response_headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(codec.content_type()),
    );
    trailers_to_headers(&trailers, &mut response_headers);

    let mut out = body.into_response();
    let out_headers = out.headers_mut();
    out_headers.remove(CONTENT_TYPE);
    for (name, value) in response_headers.iter() {
        out_headers.append(name.clone(), value.clone());
    }
    Ok(out)
}

fn supported_names(compressions: &[Compression]) -> String {
    let mut names = vec![Compression::Identity.name()];
    names.extend(compressions.iter().map(Compression::name));
    names.join(", ")
}
