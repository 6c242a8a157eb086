mod handler;
mod model;

pub use handler::{check_cache, check_database, healthcheck};
pub use model::{ComponentChecks, ComponentHealth, HealthCheck, HealthStatus};
