use std::sync::Arc;
use std::time::Duration;

use crate::cache::store::KeyValueStore;
use crate::error::CacheError;

/// 限流判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub permitted: bool,
    /// 被拒绝时距离窗口结束的时间，放行时为零
    pub retry_after: Duration,
}

impl RateDecision {
    fn permit() -> Self {
        Self {
            permitted: true,
            retry_after: Duration::ZERO,
        }
    }

    fn deny(retry_after: Duration) -> Self {
        Self {
            permitted: false,
            retry_after,
        }
    }
}

/// 固定窗口限流器
///
/// 计数器存放在共享键值存储中，多个进程共用同一个窗口。
/// 先 `INCR` 再判断，计数为 1 时设置过期时间；放行与否只取决于原子自增的结果，
/// 并发调用方不会越过上限。超过上限时返回窗口剩余时间。
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    key: String,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, limit: u32, window: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            limit: limit.max(1),
            window,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub async fn allow(&self) -> Result<RateDecision, CacheError> {
        let count = self.store.incr(&self.key).await?;
        if count == 1 {
            self.store.expire(&self.key, self.window).await?;
        }

        if count <= i64::from(self.limit) {
            return Ok(RateDecision::permit());
        }

        let retry_after = match self.store.ttl(&self.key).await? {
            Some(remaining) => remaining,
            // 计数器没有过期时间时重新开启窗口，避免永久限流；键已过期则窗口已结束
            None => {
                if self.store.expire(&self.key, self.window).await? {
                    self.window
                } else {
                    Duration::ZERO
                }
            }
        };
        Ok(RateDecision::deny(retry_after.max(Duration::from_secs(1))))
    }
}
