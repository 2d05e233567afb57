//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "vcap_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vcap_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vcap_http_requests_in_flight";
    pub const UPLOAD_BYTES_TOTAL: &str = "vcap_upload_bytes_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_upload(bytes: usize) {
    counter!(names::UPLOAD_BYTES_TOTAL).increment(bytes as u64);
}

/// Collapse job ids so the path label stays low-cardinality.
fn sanitize_path(path: &str) -> String {
    if matches!(path.strip_prefix("/render-jobs/"), Some(rest) if !rest.is_empty()) {
        "/render-jobs/:job_id".to_string()
    } else if matches!(path.strip_prefix("/download/"), Some(rest) if !rest.is_empty()) {
        "/download/:filename".to_string()
    } else {
        path.to_string()
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/render-jobs/550e8400-e29b-41d4-a716-446655440000"),
            "/render-jobs/:job_id"
        );
        assert_eq!(sanitize_path("/render-jobs"), "/render-jobs");
        assert_eq!(sanitize_path("/download/video_1.mp4"), "/download/:filename");
        assert_eq!(sanitize_path("/transcribe"), "/transcribe");
    }
}
