use std::task::{Context, Poll};
use std::time::Instant;

use metrics::{histogram, increment_counter};
use tower::{Layer, Service};

/// Emits `rpc.requests_total` and `rpc.duration_seconds` for every request
/// that goes through the wrapped service.
#[derive(Debug, Clone, Default)]
pub struct TelemetryMiddleware {
    /// Sets the label "service" in emitted metrics
    service_name: String,
}

impl TelemetryMiddleware {
    pub fn new(service_name: &str) -> TelemetryMiddleware {
        TelemetryMiddleware {
            service_name: service_name.into(),
        }
    }
}

impl<S> Layer<S> for TelemetryMiddleware {
    type Service = InnerMiddleware<S>;

    fn layer(&self, service: S) -> Self::Service {
        InnerMiddleware::new(&self.service_name, service)
    }
}

#[derive(Debug, Clone)]
pub struct InnerMiddleware<S> {
    inner: S,
    service_name: String,
}

impl<S> InnerMiddleware<S> {
    pub fn new(service_name: &str, inner: S) -> Self {
        InnerMiddleware {
            inner,
            service_name: service_name.to_owned(),
        }
    }
}

impl<S, B, ResBody> Service<http::Request<B>> for InnerMiddleware<S>
where
    S: Service<http::Request<B>, Response = http::Response<ResBody>>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Error = S::Error;
    type Future = futures::future::BoxFuture<
        'static,
        Result<Self::Response, Self::Error>,
    >;
    type Response = S::Response;

    fn poll_ready(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        // The clone we were polled ready on is the one that must be called.
        // See https://github.com/tower-rs/tower/issues/547#issuecomment-767629149
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        // Procedure paths minus the leading '/', e.g.
        // `gitpod.experimental.v1.StatsService/GetUserStats`.
        let endpoint = req
            .uri()
            .path()
            .strip_prefix('/')
            .unwrap_or_default()
            .to_owned();
        let service_name = self.service_name.clone();
        let start = Instant::now();
        increment_counter!(
            "rpc.requests_total",
            "service" => service_name.clone(),
            "endpoint" => endpoint.clone()
        );
        Box::pin(async move {
            let response = inner.call(req).await?;
            let latency_s = (Instant::now() - start).as_secs_f64();
            histogram!(
                "rpc.duration_seconds",
                latency_s,
                "service" => service_name,
                "endpoint" => endpoint,
                "status" => response.status().as_u16().to_string(),
            );

            Ok(response)
        })
    }
}
