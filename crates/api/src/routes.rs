use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::{
    handlers::{health::health_check, metrics::render_metrics},
    middleware::trace_layer,
};

/// HTTP服务状态
#[derive(Clone, Default)]
pub struct AppState {
    pub metrics: Option<PrometheusHandle>,
}

/// 创建健康检查和指标路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .layer(trace_layer())
        .with_state(state)
}
