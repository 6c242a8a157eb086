use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, error::AppError};

/// 入站限流
///
/// 在调用聚合流程之前检查客户端请求配额，超限直接返回 429，
/// `Retry-After` 为整个窗口长度。与上游请求的出站限流互不影响。
pub async fn inbound_rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match state.inbound_limiter.allow().await {
        Ok(decision) if decision.permitted => next.run(req).await,
        Ok(_) => {
            tracing::warn!("Inbound rate limit exceeded for {}", req.uri().path());
            AppError::RateLimited {
                retry_after: state.inbound_limiter.window(),
            }
            .into_response()
        }
        Err(e) => {
            tracing::error!("Inbound rate limiter unavailable: {}", e);
            AppError::Cache(e).into_response()
        }
    }
}
