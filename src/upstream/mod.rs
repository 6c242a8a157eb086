// 上游 API 抓取
// 单页抓取（限流、重试）、分页驱动、来源过滤

pub mod fetcher;
pub mod filter;
pub mod paginator;

pub use fetcher::{RetryPolicy, UpstreamFetcher};
pub use filter::OriginFilter;
pub use paginator::Paginator;
