//! Content Store - 内容存储模块。
//!
//! 将 URL 路径映射到内容根目录下的文件树，并提供 HTTP 层所需的
//! 读取、写入、批量创建与删除能力。
//!
//! 仅支持 Unix：属主与权限位取自 `st_uid`/`st_mode`。

pub mod error;
pub mod metadata;
pub mod root;
pub mod store;

pub use error::{Result, StoreError};
pub use metadata::{classify, file_meta, format_permissions};
pub use root::ContentRoot;
pub use store::{ContentStore, Node};
