/// 缓存操作

// 固定窗口限流
pub mod rate_limit;

// 聚合结果缓存
pub mod characters;

pub use characters::ResultCache;
pub use rate_limit::{RateDecision, RateLimiter};
