use axum::{Router, middleware, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    middleware::{inbound_rate_limit, log_errors},
    routes,
};

// 角色路由，入站限流只作用于此
pub fn character_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/characters", get(routes::characters::get_characters))
        .route_layer(middleware::from_fn_with_state(state, inbound_rate_limit))
}

// 健康检查路由
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/healthcheck", get(routes::health::healthcheck))
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .merge(character_routes(state.clone()))
        .merge(health_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(log_errors)),
        );

    // 开发模式允许跨域
    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.with_state(state)
}
