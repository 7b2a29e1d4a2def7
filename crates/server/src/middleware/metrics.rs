//! Prometheus metrics collection middleware
//!
//! Records `http_requests_total` (counter) and `http_request_duration_seconds`
//! (histogram) for every request, with method/path/status labels.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Normalize request paths to avoid high-cardinality labels.
/// Region names under `/api/hospitals/` collapse to `:state`.
fn normalize_path(path: &str) -> String {
    match path.strip_prefix("/api/hospitals/") {
        Some(rest) if !rest.is_empty() => "/api/hospitals/:state".to_string(),
        _ => path.to_string(),
    }
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
    use super::normalize_path;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/api/hospitals/Tamil%20Nadu"), "/api/hospitals/:state");
        assert_eq!(normalize_path("/api/hospitals/"), "/api/hospitals/");
        assert_eq!(normalize_path("/api/insights"), "/api/insights");
    }
}
