//! 元数据映射与条目分类。
//!
//! 将文件系统元数据转换为 API 响应中的结构。

use std::fs::{FileType, Metadata};
use std::os::unix::fs::MetadataExt;

use fsd_api_types::{EntryType, FileMeta};
use fsd_core::Permissions;

/// 为 `url_path` 构建通用元数据。
///
/// `path` 原样回显请求的 URL（保留末尾斜杠）；`name` 取最后一个非空段，
/// 根目录为 `/`。属主为数字 uid，不做用户名解析。
pub fn file_meta(url_path: &str, metadata: &Metadata) -> FileMeta {
    FileMeta {
        name: url_name(url_path).to_string(),
        path: url_path.to_string(),
        owner: metadata.uid().to_string(),
        permissions: format_permissions(metadata.mode()),
        size: metadata.len(),
    }
}

/// 将 `mode` 的权限位格式化为以 `0` 开头的八进制字符串。
pub fn format_permissions(mode: u32) -> String {
    Permissions::from_mode(mode).to_string()
}

/// 根据条目自身的文件类型分类，不跟随符号链接。
pub fn classify(file_type: FileType) -> EntryType {
    if file_type.is_symlink() {
        EntryType::Symlink
    } else if file_type.is_file() {
        EntryType::File
    } else if file_type.is_dir() {
        EntryType::Directory
    } else {
        EntryType::Unsupported
    }
}

/// URL 路径的最后一个非空段。
pub(crate) fn url_name(url_path: &str) -> &str {
    url_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .unwrap_or("/")
}

/// 目录 `parent` 下子条目 `name` 的 URL 路径。
pub(crate) fn child_url(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    format!("{parent}/{name}")
}
