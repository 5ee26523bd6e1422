//! API 路由模块。
//!
//! 每个路径挂载同一组方法路由，将 HTTP 请求映射为内容存储操作。

pub mod filesystem;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;

pub use filesystem::{ApiError, ApiResponse, create_filesystem_router};
pub use state::AppState;

/// 构建完整的应用路由。
///
/// PUT/POST 需要整文件写入，因此关闭默认的请求体大小限制。
pub fn build_router(state: AppState) -> Router {
    create_filesystem_router()
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
