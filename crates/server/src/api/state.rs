//! 统一的应用状态。

use content_store::{ContentRoot, ContentStore};

/// 统一的应用状态，在启动时构建一次，之后只读。
#[derive(Clone)]
pub struct AppState {
    /// 内容存储，所有请求共享同一个内容根目录。
    pub store: ContentStore,
}

impl AppState {
    /// 创建新的应用状态。
    pub fn new(root: ContentRoot) -> Self {
        Self {
            store: ContentStore::new(root),
        }
    }
}
