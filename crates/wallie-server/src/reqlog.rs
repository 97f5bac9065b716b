//! Access logging.

use axum::body::Body;
use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// One access-log entry. Also attached to the response extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLog {
    pub status: u16,
    pub method: String,
    pub path: String,
    pub remote: String,
    pub elapsed: Duration,
    pub bytes: usize,
}

/// Logs every request once the wrapped handler has produced its full
/// response.
///
/// The status is the one the handler settled on; a handler that only
/// returns a body gets 200. The body is collected so the byte count is what
/// actually goes out.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let start = Instant::now();

    let response = next.run(req).await;
    let (mut parts, body) = response.into_parts();
    let (body, bytes) = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(collected) => {
            let len = collected.len();
            (Body::from(collected), len)
        }
        Err(err) => {
            tracing::warn!(error = %err, path = %path, "response body failed");
            (Body::empty(), 0)
        }
    };

    let entry = RequestLog {
        status: parts.status.as_u16(),
        method,
        path,
        remote,
        elapsed: start.elapsed(),
        bytes,
    };
    tracing::info!(
        status = entry.status,
        method = %entry.method,
        path = %entry.path,
        remote = %entry.remote,
        elapsed_ms = entry.elapsed.as_secs_f64() * 1000.0,
        bytes = entry.bytes,
        "request"
    );

    parts.extensions.insert(entry);
    Response::from_parts(parts, body)
}
