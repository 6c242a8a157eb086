use std::time::Duration;

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::utils::{error_codes, error_to_api_response};

/// 键值存储（Redis 或内存实现）错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("key-value backend error: {0}")]
    Backend(#[from] redis::RedisError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("value at key {key} is not an integer")]
    NotAnInteger { key: String },
}

/// 单页抓取失败的分类
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream unavailable while fetching page {page} (status: {status:?})")]
    ServiceUnavailable { page: u32, status: Option<u16> },
    #[error("malformed response for page {page}: {reason}")]
    MalformedResponse { page: u32, reason: String },
    #[error("rate limiter store failed: {0}")]
    Store(#[from] CacheError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("too many requests")]
    RateLimited { retry_after: Duration },
    #[error("the upstream API is unavailable: {0}")]
    ServiceUnavailable(FetchError),
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            // 限流计数器所在的本地存储故障不算上游不可用
            FetchError::Store(e) => AppError::Cache(e),
            other => AppError::ServiceUnavailable(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, msg) = match &self {
            AppError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                error_codes::RATE_LIMIT,
                "Too many requests".to_string(),
            ),
            AppError::ServiceUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::UPSTREAM_UNAVAILABLE,
                "The upstream API is unavailable".to_string(),
            ),
            AppError::Storage(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::STORAGE_ERROR,
                format!("Failed to store characters: {}", e),
            ),
            AppError::Cache(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                format!("Cache error: {}", e),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                msg.clone(),
            ),
        };

        let mut response = (status, error_to_api_response::<()>(code, msg)).into_response();

        if let AppError::RateLimited { retry_after } = self {
            // Retry-After 至少为 1 秒
            let secs = retry_after.as_secs().max(1);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}
