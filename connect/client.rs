use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE};
use http::{HeaderValue, Method, StatusCode};
use tracing::debug;

use crate::codec::{Codec, RpcMessage};
use crate::compression::Compression;
use crate::error::ConnectError;
use crate::protocol::{
    encode_timeout,
    headers_to_trailers,
    procedure_url,
    PROTOCOL_VERSION,
    PROTOCOL_VERSION_HEADER,
    TIMEOUT_HEADER,
};
use crate::request::{Request, Response};

/// The transport a client sends its HTTP exchanges through. Implemented for
/// [`reqwest::Client`]; tests and embedders can provide their own.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, ConnectError>;
}

#[async_trait]
impl HttpClient for reqwest::Client {
    async fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, ConnectError> {
        let (parts, body) = request.into_parts();
        let response = self
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .send()
            .await
            .map_err(ConnectError::from_transport)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(ConnectError::from_transport)?;

        let mut out = http::Response::new(body);
        *out.status_mut() = status;
        *out.headers_mut() = headers;
        Ok(out)
    }
}

#[async_trait]
impl<T> HttpClient for Arc<T>
where
    T: HttpClient + ?Sized,
{
    async fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, ConnectError> {
        (**self).execute(request).await
    }
}

/// Settings shared by every procedure of a client.
///
/// By default requests are encoded as binary protobuf and sent uncompressed,
/// gzip is accepted for replies, and replies are limited to 4MiB.
#[must_use]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    codec: Codec,
    send_compression: Option<Compression>,
    accept_compression: Vec<Compression>,
    compress_min_bytes: usize,
    read_max_bytes: usize,
    timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            codec: Codec::Proto,
            send_compression: None,
            accept_compression: vec![Compression::Gzip],
            compress_min_bytes: 0,
            read_max_bytes: 4 * 1024 * 1024,
            timeout: None,
        }
    }
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Compress request bodies with the given encoding. The server must
    /// support it.
    pub fn send_compressed(mut self, compression: Compression) -> Self {
        self.send_compression = Some(compression);
        self
    }

    /// Replaces the list of encodings advertised in `accept-encoding`, in
    /// order of preference.
    pub fn accept_compressed(mut self, compressions: Vec<Compression>) -> Self {
        self.accept_compression = compressions;
        self
    }

    /// Request bodies smaller than this are sent uncompressed.
    pub fn compress_min_bytes(mut self, bytes: usize) -> Self {
        self.compress_min_bytes = bytes;
        self
    }

    /// Limits the size of a reply body, before and after decompression.
    pub fn read_max_bytes(mut self, bytes: usize) -> Self {
        self.read_max_bytes = bytes;
        self
    }

    /// Default timeout of calls that don't set their own.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A pre-bound call target for one unary procedure.
///
/// Cheap to clone; all clones share the transport and options.
pub struct UnaryClient<Req, Res> {
    http_client: Arc<dyn HttpClient>,
    url: String,
    procedure: &'static str,
    options: Arc<ClientOptions>,
    _marker: PhantomData<fn(Req) -> Res>,
}

impl<Req, Res> Clone for UnaryClient<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            url: self.url.clone(),
            procedure: self.procedure,
            options: self.options.clone(),
            _marker: PhantomData,
        }
    }
}

impl<Req, Res> std::fmt::Debug for UnaryClient<Req, Res> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnaryClient")
            .field("url", &self.url)
            .field("procedure", &self.procedure)
            .field("options", &self.options)
            .finish()
    }
}

impl<Req, Res> UnaryClient<Req, Res>
where
    Req: RpcMessage,
    Res: RpcMessage,
{
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        base_url: &str,
        procedure: &'static str,
        options: Arc<ClientOptions>,
    ) -> Self {
        Self {
            http_client,
            url: procedure_url(base_url, procedure),
            procedure,
            options,
            _marker: PhantomData,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn procedure(&self) -> &'static str {
        self.procedure
    }

    /// Performs exactly one request/response exchange.
    #[tracing::instrument(skip_all, fields(procedure = self.procedure))]
    pub async fn call_unary(
        &self,
        request: Request<Req>,
    ) -> Result<Response<Res>, ConnectError> {
        let options = &self.options;
        let (mut headers, timeout, message) = request.into_parts();
        let timeout = timeout.or(options.timeout);

        let mut body = options.codec.encode(&message)?;
        if let Some(compression) = options.send_compression {
            if compression != Compression::Identity
                && body.len() >= options.compress_min_bytes
            {
                body = compression.compress(&body)?;
                headers.insert(
                    CONTENT_ENCODING,
                    HeaderValue::from_static(compression.name()),
                );
            }
        }

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(options.codec.content_type()),
        );
        headers.insert(
            PROTOCOL_VERSION_HEADER,
            HeaderValue::from_static(PROTOCOL_VERSION),
        );
        if !options.accept_compression.is_empty() {
            let accept = options
                .accept_compression
                .iter()
                .map(Compression::name)
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(accept) = HeaderValue::from_str(&accept) {
                headers.insert(ACCEPT_ENCODING, accept);
            }
        }
        if let Some(timeout) = timeout {
            headers.insert(TIMEOUT_HEADER, encode_timeout(timeout));
        }

        let mut http_request = http::Request::builder()
            .method(Method::POST)
            .uri(&self.url)
            .body(body)
            .map_err(|e| {
                ConnectError::internal(format!(
                    "invalid procedure url '{}': {e}",
                    self.url
                ))
            })?;
        *http_request.headers_mut() = headers;

        debug!(
            url = %self.url,
            codec = options.codec.name(),
            "Sending unary request"
        );
        let exchange = self.http_client.execute(http_request);
        let response = match timeout {
            | Some(timeout) => {
                tokio::time::timeout(timeout, exchange).await.map_err(|_| {
                    ConnectError::deadline_exceeded(format!(
                        "{} did not complete within {timeout:?}",
                        self.procedure
                    ))
                })??
            }
            | None => exchange.await?,
        };

        self.read_response(response)
    }

    fn read_response(
        &self,
        response: http::Response<Bytes>,
    ) -> Result<Response<Res>, ConnectError> {
        let options = &self.options;
        let (parts, body) = response.into_parts();
        let mut headers = parts.headers;

        let compression = match headers.get(CONTENT_ENCODING) {
            | None => Compression::Identity,
            | Some(value) => {
                value
                    .to_str()
                    .ok()
                    .and_then(Compression::from_name)
                    .ok_or_else(|| {
                        ConnectError::internal(format!(
                            "unknown compression {value:?}"
                        ))
                    })?
            }
        };

        if parts.status != StatusCode::OK {
            // Oversized or undecodable error bodies fall back to the status.
            let body = if body.len() > options.read_max_bytes {
                Bytes::new()
            } else {
                compression
                    .decompress(body.clone(), options.read_max_bytes)
                    .unwrap_or(body)
            };
            let err =
                ConnectError::from_http_response(parts.status, &headers, &body);
            debug!(code = %err.code(), "Unary request failed");
            return Err(err);
        }

        if body.len() > options.read_max_bytes {
            return Err(ConnectError::resource_exhausted(format!(
                "message size {} is larger than configured max {}",
                body.len(),
                options.read_max_bytes
            )));
        }

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(Codec::from_content_type);
        if content_type != Some(options.codec) {
            return Err(ConnectError::internal(format!(
                "invalid content-type {:?}; expecting {:?}",
                headers.get(CONTENT_TYPE),
                options.codec.content_type()
            )));
        }

        let body = compression.decompress(body, options.read_max_bytes)?;
        let message = options
            .codec
            .decode::<Res>(&body)
            .map_err(|e| ConnectError::internal(e.message().to_owned()))?;

        let trailers = headers_to_trailers(&mut headers);
        Ok(Response::from_parts(message, headers, trailers))
    }
}
