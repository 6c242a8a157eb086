use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub upstream_base_url: String,
    pub upstream_query: String,
    pub origin_marker: String,
    pub request_timeout_secs: u64,
    pub retry_max_attempts: u32,
    pub retry_initial_backoff_secs: u64,
    pub retry_max_backoff_secs: u64,
    pub default_retry_after_secs: u64,
    // 出站（上游 API）限流
    pub upstream_rate_limit: u32,
    pub upstream_rate_window_secs: u64,
    // 入站（客户端请求）限流
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    pub cache_ttl_secs: u64,
    pub cache_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: String::new(),
            redis_url: String::new(),
            server_host: "0.0.0.0".into(),
            server_port: 8000,
            upstream_base_url: "https://rickandmortyapi.com/api/character".into(),
            upstream_query: "species=Human&status=Alive".into(),
            origin_marker: "Earth".into(),
            request_timeout_secs: 30,
            retry_max_attempts: 3,
            retry_initial_backoff_secs: 4,
            retry_max_backoff_secs: 10,
            default_retry_after_secs: 60,
            upstream_rate_limit: 5,
            upstream_rate_window_secs: 60,
            rate_limit_requests: 100,
            rate_limit_window_secs: 60,
            cache_ttl_secs: 30,
            cache_key: "characters".into(),
        }
    }
}

/// 读取可选环境变量，缺失或解析失败时使用默认值
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    parse_or(env::var(name).ok(), default)
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            server_host: env_or("SERVER_HOST", defaults.server_host),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            upstream_base_url: env_or("UPSTREAM_BASE_URL", defaults.upstream_base_url),
            upstream_query: env_or("UPSTREAM_QUERY", defaults.upstream_query),
            origin_marker: env_or("ORIGIN_MARKER", defaults.origin_marker),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            retry_max_attempts: env_or("RETRY_MAX_ATTEMPTS", defaults.retry_max_attempts),
            retry_initial_backoff_secs: env_or(
                "RETRY_INITIAL_BACKOFF_SECS",
                defaults.retry_initial_backoff_secs,
            ),
            retry_max_backoff_secs: env_or("RETRY_MAX_BACKOFF_SECS", defaults.retry_max_backoff_secs),
            default_retry_after_secs: env_or(
                "DEFAULT_RETRY_AFTER_SECS",
                defaults.default_retry_after_secs,
            ),
            upstream_rate_limit: env_or("UPSTREAM_RATE_LIMIT", defaults.upstream_rate_limit),
            upstream_rate_window_secs: env_or(
                "UPSTREAM_RATE_WINDOW",
                defaults.upstream_rate_window_secs,
            ),
            rate_limit_requests: env_or("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests),
            rate_limit_window_secs: env_or("RATE_LIMIT_WINDOW", defaults.rate_limit_window_secs),
            cache_ttl_secs: env_or("REDIS_TTL", defaults.cache_ttl_secs),
            cache_key: env_or("CACHE_KEY", defaults.cache_key),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn upstream_rate_window(&self) -> Duration {
        Duration::from_secs(self.upstream_rate_window_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn default_retry_after(&self) -> Duration {
        Duration::from_secs(self.default_retry_after_secs)
    }
}
