use metrics::{describe_counter, describe_histogram, Unit};

/// Optional but adds description/help message to the metrics emitted to metric
/// sink.
pub(crate) fn install_metrics() {
    describe_counter!(
        "rpc.requests_total",
        Unit::Count,
        "Total Connect RPC requests received"
    );
    describe_histogram!(
        "rpc.duration_seconds",
        Unit::Seconds,
        "Total latency of Connect RPC processing in seconds"
    );
}
