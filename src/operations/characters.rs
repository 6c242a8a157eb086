use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::ResultCache;
use crate::database::CharacterRepository;
use crate::error::AppError;
use crate::models::Character;
use crate::upstream::{OriginFilter, Paginator};

/// 聚合流程：查缓存 -> 分页抓取 -> 过滤 -> 入库 -> 写缓存
///
/// 同一进程内的缓存未命中路径由 `refresh_lock` 串行化，拿到锁后会再查一次缓存，
/// 因此并发请求只有一个会访问上游。跨进程不做合并，最后写入者生效。
pub struct CharacterService {
    cache: ResultCache,
    cache_key: String,
    paginator: Paginator,
    filter: OriginFilter,
    repository: Arc<dyn CharacterRepository>,
    refresh_lock: Mutex<()>,
}

impl CharacterService {
    pub fn new(
        cache: ResultCache,
        cache_key: impl Into<String>,
        paginator: Paginator,
        filter: OriginFilter,
        repository: Arc<dyn CharacterRepository>,
    ) -> Self {
        Self {
            cache,
            cache_key: cache_key.into(),
            paginator,
            filter,
            repository,
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn get_aggregate(&self) -> Result<Vec<Character>, AppError> {
        if let Some(characters) = self.cached().await {
            return Ok(characters);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(characters) = self.cached().await {
            return Ok(characters);
        }
        tracing::info!("Cache miss for {}, fetching from upstream", self.cache_key);

        let fetched = self.paginator.fetch_all().await.map_err(|e| {
            tracing::error!("Failed to fetch first page: {}", e);
            AppError::from(e)
        })?;

        let characters = dedup_by_id(self.filter.apply(&fetched).cloned());
        if characters.is_empty() {
            tracing::info!("No {} characters found", self.filter.marker());
        }

        if let Err(e) = self.repository.upsert(&characters).await {
            tracing::error!("Failed to save {} characters: {}", characters.len(), e);
            return Err(AppError::Storage(e));
        }

        match self.cache.set(&self.cache_key, &characters).await {
            Ok(()) => tracing::info!(
                "Successfully saved {} characters to database and cache",
                characters.len()
            ),
            Err(e) => tracing::warn!(
                "Saved {} characters to database but failed to populate cache: {}",
                characters.len(),
                e
            ),
        }

        Ok(characters)
    }

    /// 缓存读取失败按未命中处理
    async fn cached(&self) -> Option<Vec<Character>> {
        match self.cache.get(&self.cache_key).await {
            Ok(Some(characters)) => {
                tracing::debug!("Cache hit for {} ({} characters)", self.cache_key, characters.len());
                Some(characters)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read cache {}: {}", self.cache_key, e);
                None
            }
        }
    }
}

/// 按 id 去重，保留首次出现的位置
fn dedup_by_id(characters: impl Iterator<Item = Character>) -> Vec<Character> {
    let mut seen = HashSet::new();
    characters.filter(|c| seen.insert(c.id)).collect()
}
