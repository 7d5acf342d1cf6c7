use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// 请求日志中间件
pub async fn request_logging(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let start_time = Instant::now();

    let response = next.run(req).await;

    let duration = start_time.elapsed();
    let status = response.status();

    tracing::info!(
        "Request completed: {} {} - {} - {}ms",
        method,
        uri,
        status,
        duration.as_millis()
    );

    response
}
