//! Prometheus metrics collection middleware
//!
//! Records `http_requests_total` (counter) and `http_request_duration_seconds`
//! (histogram) for every request, with method/path/status labels.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Normalize request paths to avoid high-cardinality labels.
/// Hospital ids are provider place ids, so collapse the segment after
/// `hospital` to `:id`.
fn normalize_path(path: &str) -> String {
    let mut out = Vec::new();
    let mut after_hospital = false;
    for seg in path.split('/') {
        if after_hospital && !seg.is_empty() {
            out.push(":id");
        } else {
            out.push(seg);
        }
        after_hospital = seg == "hospital";
    }
    out.join("/")
}

/// Middleware that records request count and duration metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hospital_ids_are_collapsed() {
        assert_eq!(
            normalize_path("/api/hospital/ChIJd8BlQ2BZwokRAFUEcm_qrcA"),
            "/api/hospital/:id"
        );
        assert_eq!(normalize_path("/api/hospitals"), "/api/hospitals");
        assert_eq!(normalize_path("/api/predictions"), "/api/predictions");
    }
}
