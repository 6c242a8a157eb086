// 缓存模块
// 共享键值存储，以及基于它的限流与结果缓存

pub mod keys;
pub mod operations;
pub mod store;

pub use operations::{RateDecision, RateLimiter, ResultCache};
pub use store::{KeyValueStore, MemoryStore, RedisStore};
