pub mod handlers;
pub mod middleware;

use crate::{models::TissueClassifier, models::CLASS_LABELS, Config, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

/// 应用状态，通过axum状态注入到各处理器
///
/// 模型句柄在启动时构造一次：Some表示加载成功，None表示
/// 加载失败且进程存活期间保持降级状态。
#[derive(Clone)]
pub struct AppState {
    pub classifier: Option<Arc<TissueClassifier>>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let classifier = match TissueClassifier::new(&config) {
            Ok(classifier) => {
                tracing::info!("Model loaded successfully");
                Some(Arc::new(classifier))
            }
            Err(e) => {
                tracing::error!("Error loading model: {}", e);
                None
            }
        };

        Self { classifier, config }
    }
}

pub async fn serve(config: Config) -> Result<()> {
    // 加载模型并构建应用路由
    let state = AppState::new(config.clone());
    let app = create_app(state);

    // 解析绑定地址
    let addr: SocketAddr = config.bind_addr.parse().map_err(|e| {
        crate::utils::error::AnalyzeError::Config(format!(
            "Invalid bind address {}: {}",
            config.bind_addr, e
        ))
    })?;

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  POST /api/analyze - Multipart image upload");
    tracing::info!("  GET  /api/health  - Health check");

    // 启动服务器
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        crate::utils::error::AnalyzeError::Internal(format!(
            "Failed to bind to address {}: {}",
            addr, e
        ))
    })?;

    axum::serve(listener, app).await.map_err(|e| {
        crate::utils::error::AnalyzeError::Internal(format!("Server failed to start: {}", e))
    })?;

    Ok(())
}

pub fn create_app(state: AppState) -> Router {
    let max_request_size = state.config.server_config.max_request_size;
    let request_timeout = state.config.server_config.request_timeout;

    Router::new()
        // 分析API路由
        .route("/api/analyze", post(handlers::analyze_handler))
        // 系统路由
        .route("/api/health", get(health_handler))
        // 添加中间件 - 使用分层模式避免复杂类型嵌套
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .layer(DefaultBodyLimit::max(max_request_size))
        .layer(RequestBodyLimitLayer::new(max_request_size))
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout)))
        .layer(CorsLayer::permissive()) // 前端独立部署，使用宽松CORS
        .with_state(state)
}

/// 健康检查端点，同时报告模型状态
async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "model_loaded": state.classifier.is_some(),
        "available_classes": CLASS_LABELS,
    }))
}
