use std::sync::Arc;
use std::time::Duration;

use crate::cache::store::KeyValueStore;
use crate::error::CacheError;
use crate::models::Character;

/// 聚合结果缓存
///
/// 条目写入后不再修改，只靠 TTL 失效，因此并发读写无需加锁。
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 读取未过期的聚合结果
    pub async fn get(&self, key: &str) -> Result<Option<Vec<Character>>, CacheError> {
        match self.store.get(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// 无条件覆盖写入，使用配置的 TTL
    pub async fn set(&self, key: &str, characters: &[Character]) -> Result<(), CacheError> {
        let json = serde_json::to_string(characters)?;
        self.store.set_ex(key, &json, self.ttl).await
    }
}
