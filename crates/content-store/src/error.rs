//! 内容存储错误类型。

use std::io;
use std::path::Path;

use thiserror::Error;

/// 内容存储错误类型。
///
/// I/O 错误保留操作名与解析后的文件系统路径，消息形如
/// `stat /srv/data/missing.txt: No such file or directory`。
#[derive(Debug, Error)]
pub enum StoreError {
    /// 路径不存在。
    #[error("{op} {path}: {source}")]
    NotFound {
        op: &'static str,
        path: String,
        source: io::Error,
    },

    /// 权限不足。
    #[error("{op} {path}: {source}")]
    PermissionDenied {
        op: &'static str,
        path: String,
        source: io::Error,
    },

    /// 非递归删除非空目录。
    #[error("{op} {path}: {source}")]
    DirectoryNotEmpty {
        op: &'static str,
        path: String,
        source: io::Error,
    },

    /// 其他 I/O 错误。
    #[error("{op} {path}: {source}")]
    Io {
        op: &'static str,
        path: String,
        source: io::Error,
    },

    /// 请求体不是合法 JSON。
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// 目标存在但不是普通文件。
    #[error("{0} is not a file")]
    NotAFile(String),

    /// 目标存在但不是目录。
    #[error("{0} is not a directory")]
    NotADirectory(String),

    /// 权限字符串不是八进制数。
    #[error("{0} has invalid octal permissions")]
    InvalidPermissions(String),

    /// 批量条目名称不是单个路径段。
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    /// URL 路径无法映射到内容根目录之内。
    #[error("{path}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// 既不是文件也不是目录（设备、套接字、管道等）。
    #[error("unsupported file type")]
    UnsupportedFileType,

    /// 拒绝删除内容根目录本身。
    #[error("cannot delete the content root")]
    RootDeletion,
}

impl StoreError {
    /// 按错误种类对 `op` 在 `path` 上的 I/O 失败进行分类。
    pub fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        let path = path.display().to_string();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { op, path, source },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { op, path, source },
            io::ErrorKind::DirectoryNotEmpty => Self::DirectoryNotEmpty { op, path, source },
            _ => Self::Io { op, path, source },
        }
    }

    /// 不做分类，直接视为内部 I/O 错误。
    ///
    /// 用于 stat 已成功之后的读取：此时任何失败都属于意外情况。
    pub fn internal(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.display().to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_classified_by_kind() {
        let path = Path::new("/srv/data/file.txt");

        let err = StoreError::io("stat", path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, StoreError::NotFound { op: "stat", .. }));
        assert!(err.to_string().starts_with("stat /srv/data/file.txt: "));

        let err = StoreError::io("open", path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, StoreError::PermissionDenied { .. }));

        let err = StoreError::io(
            "remove",
            path,
            io::Error::from(io::ErrorKind::DirectoryNotEmpty),
        );
        assert!(matches!(err, StoreError::DirectoryNotEmpty { .. }));

        let err = StoreError::io("write", path, io::Error::other("disk on fire"));
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(err.to_string(), "write /srv/data/file.txt: disk on fire");
    }

    #[test]
    fn internal_errors_skip_classification() {
        let path = Path::new("/srv/data/file.txt");

        for kind in [
            io::ErrorKind::NotFound,
            io::ErrorKind::PermissionDenied,
            io::ErrorKind::DirectoryNotEmpty,
        ] {
            let err = StoreError::internal("read", path, io::Error::from(kind));
            assert!(matches!(err, StoreError::Io { op: "read", .. }));
            assert!(err.to_string().starts_with("read /srv/data/file.txt: "));
        }
    }
}
