use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// One line per request: method, uri, status and latency. Bodies are not
/// logged since auth payloads carry passwords.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::error!(%method, %uri, status = status.as_u16(), latency_ms, "request failed");
    } else {
        tracing::info!(%method, %uri, status = status.as_u16(), latency_ms, "request");
    }

    response
}
