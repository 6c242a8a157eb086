use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use super::model::{ComponentChecks, ComponentHealth, HealthCheck, HealthStatus};
use crate::{
    AppState,
    cache::{KeyValueStore, keys::HEALTHCHECK_KEY},
    database::CharacterRepository,
};

const PROBE_VALUE: &str = "test_value";

pub async fn check_database(repository: &dyn CharacterRepository) -> ComponentHealth {
    match repository.ping().await {
        Ok(()) => ComponentHealth::healthy("Database connection successfully checked"),
        Err(e) => ComponentHealth::unhealthy(format!("Database error: {}", e)),
    }
}

/// 依次检查 PING、写、读、删
pub async fn check_cache(store: &dyn KeyValueStore) -> ComponentHealth {
    if let Err(e) = store.ping().await {
        return ComponentHealth::unhealthy(format!("Cache ping failed: {}", e));
    }
    if let Err(e) = store
        .set_ex(HEALTHCHECK_KEY, PROBE_VALUE, Duration::from_secs(10))
        .await
    {
        return ComponentHealth::unhealthy(format!("Cache write operation failed: {}", e));
    }
    match store.get(HEALTHCHECK_KEY).await {
        Ok(Some(value)) if value == PROBE_VALUE => {}
        Ok(_) => return ComponentHealth::unhealthy("Cache read operation failed"),
        Err(e) => {
            return ComponentHealth::unhealthy(format!("Cache read operation failed: {}", e));
        }
    }
    if let Err(e) = store.del(HEALTHCHECK_KEY).await {
        return ComponentHealth::unhealthy(format!("Cache delete operation failed: {}", e));
    }
    ComponentHealth::healthy("Cache connection and operations successfully checked")
}

pub async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    let checks = ComponentChecks {
        database: check_database(state.repository.as_ref()).await,
        cache: check_cache(state.store.as_ref()).await,
    };
    let health = HealthCheck::from_checks(checks);

    let status = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => {
            tracing::warn!("Health check failed: {:?}", health.checks);
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (status, Json(health))
}
