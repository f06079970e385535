use http::header::{CONTENT_TYPE, USER_AGENT};
use http::Request;
use tower_http::trace::MakeSpan;
use tracing::error_span;

/// Opens one span per HTTP exchange carrying the procedure being called.
#[derive(Clone, Debug)]
pub struct RpcMakeSpan {
    service_name: String,
}

impl RpcMakeSpan {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

impl<B> MakeSpan<B> for RpcMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> tracing::Span {
        let user_agent = request.headers().get(USER_AGENT);
        let content_type = request.headers().get(CONTENT_TYPE);
        error_span!(
            target: "rpc_request_metadata",
            "rpc_request",
            service = %self.service_name,
            method = %request.method(),
            procedure = %request.uri().path(),
            version = ?request.version(),
            content_type = ?content_type,
            user_agent = ?user_agent,
        )
    }
}
