// 缓存键

/// 出站（上游 API）请求计数键
pub const UPSTREAM_REQUEST_COUNT_KEY: &str = "api_request_count";

/// 入站请求计数键
pub const INBOUND_REQUEST_COUNT_KEY: &str = "inbound_request_count";

/// 健康检查探测键
pub const HEALTHCHECK_KEY: &str = "healthcheck:test";
