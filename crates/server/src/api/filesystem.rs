//! 文件系统 API 路由。
//!
//! URL 路径指向内容根目录下的条目，HTTP 方法决定执行的操作。
//! 所有响应（包括错误）都是 JSON 格式的 `ResponseBody`。

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequestParts, Path, Query, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use content_store::StoreError;
use fsd_api_types::ResponseBody;
use fsd_core::DeleteMode;
use tracing::{error, warn};

use super::state::AppState;

/// 创建文件系统 API 路由。
///
/// 通配符只匹配非空路径，因此根路径 `/` 需要单独注册。
pub fn create_filesystem_router() -> Router<Arc<AppState>> {
    Router::new()
        // 根目录
        .route("/", content_routes())
        // 根目录下的任意路径
        .route("/{*path}", content_routes())
}

/// 每个路径共用的方法路由，其他方法统一返回 405。
fn content_routes() -> MethodRouter<Arc<AppState>> {
    get(read_path)
        .put(put_file)
        .post(create_files)
        .delete(delete_path)
        .fallback(method_not_allowed)
}

/// 已完成百分号解码的请求路径，保留开头的 `/` 与末尾的 `/`。
#[derive(Debug)]
struct UrlPath(String);

impl<S> FromRequestParts<S> for UrlPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if parts.uri.path() == "/" {
            return Ok(Self("/".to_string()));
        }

        let Path(rest) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text()))?;
        Ok(Self(format!("/{rest}")))
    }
}

/// DELETE 的删除模式，取自查询参数 `recursive`。
///
/// 参数重复时只取第一个值，其他查询参数忽略。
#[derive(Debug)]
struct DeleteOptions(DeleteMode);

impl<S> FromRequestParts<S> for DeleteOptions
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|rejection| ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text()))?;
        let recursive = params
            .iter()
            .find(|(key, _)| key == "recursive")
            .map(|(_, value)| value.as_str());
        Ok(Self(DeleteMode::from_query(recursive)))
    }
}

/// 读取文件内容或列出目录。
async fn read_path(
    State(state): State<Arc<AppState>>,
    UrlPath(path): UrlPath,
) -> Result<ApiResponse, ApiError> {
    let store = state.store.clone();
    let node = run_blocking(move || store.read(&path)).await?;
    Ok(ApiResponse(node.into()))
}

/// 创建或覆盖单个文件。
async fn put_file(
    State(state): State<Arc<AppState>>,
    UrlPath(path): UrlPath,
    body: Bytes,
) -> Result<ApiResponse, ApiError> {
    let store = state.store.clone();
    let file = run_blocking(move || store.put_file(&path, &body)).await?;
    Ok(ApiResponse(ResponseBody::File(file)))
}

/// 在目录中批量创建文件。
async fn create_files(
    State(state): State<Arc<AppState>>,
    UrlPath(path): UrlPath,
    body: Bytes,
) -> Result<ApiResponse, ApiError> {
    let store = state.store.clone();
    let directory = run_blocking(move || store.create_files(&path, &body)).await?;
    Ok(ApiResponse(ResponseBody::Directory(directory)))
}

/// 删除文件或目录，`?recursive=true` 时递归删除整个子树。
async fn delete_path(
    State(state): State<Arc<AppState>>,
    UrlPath(path): UrlPath,
    DeleteOptions(mode): DeleteOptions,
) -> Result<ApiResponse, ApiError> {
    let store = state.store.clone();
    run_blocking(move || store.delete(&path, mode)).await?;
    Ok(ApiResponse(ResponseBody::Deleted))
}

/// 不支持的 HTTP 方法。
async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

/// 在阻塞线程池上执行存储操作。
async fn run_blocking<T, F>(operation: F) -> Result<T, ApiError>
where
    F: FnOnce() -> content_store::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|err| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("filesystem task failed: {err}"),
            )
        })?
        .map_err(ApiError::from)
}

/// JSON 响应，HTTP 状态码由响应体决定。
#[derive(Debug)]
pub struct ApiResponse(pub ResponseBody);

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}

/// API 错误类型。
#[derive(Debug)]
pub struct ApiError {
    /// 错误消息，原样返回给客户端。
    message: String,
    /// HTTP 状态码。
    status: StatusCode,
}

impl ApiError {
    /// 创建新的 API 错误。
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// 获取 HTTP 状态码。
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// 获取错误消息。
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::PermissionDenied { .. } => StatusCode::UNAUTHORIZED,
            StoreError::DirectoryNotEmpty { .. }
            | StoreError::InvalidJson(_)
            | StoreError::NotAFile(_)
            | StoreError::NotADirectory(_)
            | StoreError::InvalidPermissions(_)
            | StoreError::InvalidName(_)
            | StoreError::InvalidPath { .. }
            | StoreError::UnsupportedFileType
            | StoreError::RootDeletion => StatusCode::BAD_REQUEST,
            StoreError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "request failed");
        } else {
            warn!(status = %self.status, error = %self.message, "request rejected");
        }

        ApiResponse(ResponseBody::error(self.status.as_u16(), self.message)).into_response()
    }
}
