use std::time::Duration;

use reqwest::{Client, StatusCode, header::HeaderMap};
use tokio::time::sleep;
use url::Url;

use crate::cache::RateLimiter;
use crate::config::Config;
use crate::error::{AppError, FetchError};
use crate::models::Page;

/// 传输层失败的重试策略
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 总尝试次数（含第一次）
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// 429 响应缺少 `Retry-After` 时的等待时间
    pub default_retry_after: Duration,
}

impl RetryPolicy {
    /// 第 `attempt` 次失败后的等待时间，指数增长并封顶
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    pub fn retry_after(&self, headers: &HeaderMap) -> Duration {
        headers
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(self.default_retry_after)
    }
}

impl From<&Config> for RetryPolicy {
    fn from(config: &Config) -> Self {
        Self {
            max_attempts: config.retry_max_attempts.max(1),
            initial_backoff: Duration::from_secs(config.retry_initial_backoff_secs),
            max_backoff: Duration::from_secs(config.retry_max_backoff_secs),
            default_retry_after: config.default_retry_after(),
        }
    }
}

struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

/// 单页抓取
///
/// 每次发请求前先经过出站限流器；被限流和上游 429 都只是等待，
/// 不消耗重试次数。只有连接失败、超时这类传输错误才按 [`RetryPolicy`] 退避重试。
#[derive(Clone)]
pub struct UpstreamFetcher {
    client: Client,
    base_url: Url,
    limiter: RateLimiter,
    policy: RetryPolicy,
}

impl UpstreamFetcher {
    pub fn new(
        base_url: &str,
        query: &str,
        timeout: Duration,
        limiter: RateLimiter,
        policy: RetryPolicy,
    ) -> Result<Self, AppError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| AppError::Internal(format!("Invalid upstream url {}: {}", base_url, e)))?;
        if !query.is_empty() {
            let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect();
            base_url.query_pairs_mut().extend_pairs(pairs);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            limiter,
            policy,
        })
    }

    pub fn from_config(config: &Config, limiter: RateLimiter) -> Result<Self, AppError> {
        Self::new(
            &config.upstream_base_url,
            &config.upstream_query,
            config.request_timeout(),
            limiter,
            RetryPolicy::from(config),
        )
    }

    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }

    pub async fn fetch(&self, page: u32) -> Result<Page, FetchError> {
        let url = self.page_url(page);
        let mut attempt = 0u32;

        loop {
            let decision = self.limiter.allow().await?;
            if !decision.permitted {
                tracing::warn!(
                    "Rate limited. Waiting {} seconds before fetching page {}",
                    decision.retry_after.as_secs(),
                    page
                );
                sleep(decision.retry_after).await;
                continue;
            }

            tracing::debug!("Fetching page {} from {}", page, url);
            let response = match self.send(&url).await {
                Ok(response) => response,
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.policy.max_attempts {
                        tracing::error!(
                            "Request error on page {} after {} attempts: {}",
                            page,
                            attempt,
                            e
                        );
                        return Err(FetchError::ServiceUnavailable { page, status: None });
                    }
                    let delay = self.policy.backoff(attempt);
                    tracing::warn!(
                        "Request error on page {} (attempt {}/{}): {}. Retrying in {:?}",
                        page,
                        attempt,
                        self.policy.max_attempts,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    continue;
                }
            };

            if response.status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = self.policy.retry_after(&response.headers);
                tracing::warn!(
                    "Rate limited by API on page {}. Waiting {} seconds.",
                    page,
                    retry_after.as_secs()
                );
                sleep(retry_after).await;
                continue;
            }

            if !response.status.is_success() {
                tracing::error!(
                    "Error response {} while requesting page {}",
                    response.status.as_u16(),
                    page
                );
                return Err(FetchError::ServiceUnavailable {
                    page,
                    status: Some(response.status.as_u16()),
                });
            }

            return serde_json::from_slice::<Page>(&response.body).map_err(|e| {
                FetchError::MalformedResponse {
                    page,
                    reason: e.to_string(),
                }
            });
        }
    }

    async fn send(&self, url: &Url) -> Result<RawResponse, reqwest::Error> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::header::{HeaderValue, RETRY_AFTER};

    use super::*;
    use crate::cache::MemoryStore;

    fn policy() -> RetryPolicy {
        RetryPolicy::from(&Config::default())
    }

    #[test]
    fn backoff_starts_at_initial_and_is_capped() {
        let policy = policy();
        assert_eq!(policy.backoff(1), Duration::from_secs(4));
        assert_eq!(policy.backoff(2), Duration::from_secs(8));
        assert_eq!(policy.backoff(3), Duration::from_secs(10));
        assert_eq!(policy.backoff(40), Duration::from_secs(10));
    }

    #[test]
    fn retry_after_defaults_to_sixty_seconds() {
        let policy = policy();
        let mut headers = HeaderMap::new();
        assert_eq!(policy.retry_after(&headers), Duration::from_secs(60));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
        assert_eq!(policy.retry_after(&headers), Duration::from_secs(2));

        // HTTP 日期格式不解析，退回默认值
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(policy.retry_after(&headers), Duration::from_secs(60));
    }

    #[test]
    fn page_url_keeps_base_query() {
        let limiter = RateLimiter::new(
            Arc::new(MemoryStore::new()),
            "api_request_count",
            5,
            Duration::from_secs(60),
        );
        let fetcher = UpstreamFetcher::new(
            "https://rickandmortyapi.com/api/character",
            "species=Human&status=Alive",
            Duration::from_secs(30),
            limiter,
            policy(),
        )
        .unwrap();

        assert_eq!(
            fetcher.page_url(3).as_str(),
            "https://rickandmortyapi.com/api/character?species=Human&status=Alive&page=3"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        let limiter = RateLimiter::new(
            Arc::new(MemoryStore::new()),
            "api_request_count",
            5,
            Duration::from_secs(60),
        );
        let result = UpstreamFetcher::new("not a url", "", Duration::from_secs(30), limiter, policy());
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
