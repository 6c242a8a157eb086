use std::sync::Arc;

use cache::{KeyValueStore, RateLimiter, ResultCache, keys};
use config::Config;
use database::CharacterRepository;
use error::AppError;
use operations::CharacterService;
use upstream::{OriginFilter, Paginator, UpstreamFetcher};

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod operations;
pub mod result;
pub mod router;
pub mod routes;
pub mod upstream;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub characters: Arc<CharacterService>,
    pub repository: Arc<dyn CharacterRepository>,
    pub store: Arc<dyn KeyValueStore>,
    /// 入站限流，与出站（上游）限流使用不同的计数键
    pub inbound_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        repository: Arc<dyn CharacterRepository>,
    ) -> Result<Self, AppError> {
        let upstream_limiter = RateLimiter::new(
            store.clone(),
            keys::UPSTREAM_REQUEST_COUNT_KEY,
            config.upstream_rate_limit,
            config.upstream_rate_window(),
        );
        let fetcher = UpstreamFetcher::from_config(&config, upstream_limiter)?;

        let characters = CharacterService::new(
            ResultCache::new(store.clone(), config.cache_ttl()),
            config.cache_key.clone(),
            Paginator::new(fetcher),
            OriginFilter::new(config.origin_marker.clone()),
            repository.clone(),
        );

        let inbound_limiter = RateLimiter::new(
            store.clone(),
            keys::INBOUND_REQUEST_COUNT_KEY,
            config.rate_limit_requests,
            config.rate_limit_window(),
        );

        Ok(AppState {
            config,
            characters: Arc::new(characters),
            repository,
            store,
            inbound_limiter,
        })
    }
}
