//! 内容根目录。
//!
//! 所有 URL 路径都相对于该目录解析。

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// 内容根目录。
#[derive(Debug, Clone)]
pub struct ContentRoot {
    /// 规范化后的根目录绝对路径。
    base: PathBuf,
}

impl ContentRoot {
    /// 打开已存在的目录作为内容根目录。
    ///
    /// 仅在此处规范化一次路径，之后的解析均为纯词法处理。
    pub fn open(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref();
        let canonical = base
            .canonicalize()
            .map_err(|e| StoreError::io("open", base, e))?;

        if !canonical.is_dir() {
            return Err(StoreError::NotADirectory(canonical.display().to_string()));
        }

        Ok(Self { base: canonical })
    }

    /// 获取根目录路径。
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// 将 `/a/b/file.txt` 形式的 URL 路径映射到文件系统路径。
    ///
    /// 忽略空段与 `.` 段；`..` 段与 NUL 字节直接拒绝而不做归一化，
    /// 因此结果不会超出根目录。
    pub fn resolve(&self, url_path: &str) -> Result<PathBuf> {
        let invalid = |reason| StoreError::InvalidPath {
            path: url_path.to_string(),
            reason,
        };

        if url_path.contains('\0') {
            return Err(invalid("path contains a null byte"));
        }

        let mut resolved = self.base.clone();
        for segment in url_path.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(invalid("path escapes the content root")),
                name => resolved.push(name),
            }
        }

        if !resolved.starts_with(&self.base) {
            return Err(invalid("path escapes the content root"));
        }

        Ok(resolved)
    }

    /// 检查路径是否为根目录本身。
    pub fn is_root(&self, path: &Path) -> bool {
        path == self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn resolves_nested_paths_under_root() {
        let dir = tempdir().expect("create temp dir");
        let root = ContentRoot::open(dir.path()).expect("open root");

        let resolved = root.resolve("/a/b/hello.txt").expect("resolve path");
        assert_eq!(resolved, root.base().join("a").join("b").join("hello.txt"));

        let resolved = root.resolve("/a//./b/").expect("resolve path");
        assert_eq!(resolved, root.base().join("a").join("b"));

        assert!(root.is_root(&root.resolve("/").expect("resolve root")));
    }

    #[test]
    fn rejects_parent_segments() {
        let dir = tempdir().expect("create temp dir");
        let root = ContentRoot::open(dir.path()).expect("open root");

        for raw in ["/../etc/passwd", "/a/../../b", "/a/.."] {
            let err = root.resolve(raw).expect_err("parent segment should be rejected");
            assert_eq!(err.to_string(), format!("{raw}: path escapes the content root"));
        }
    }

    #[test]
    fn rejects_null_bytes() {
        let dir = tempdir().expect("create temp dir");
        let root = ContentRoot::open(dir.path()).expect("open root");

        assert!(matches!(
            root.resolve("/a\0b"),
            Err(StoreError::InvalidPath { .. })
        ));
    }

    #[test]
    fn open_requires_existing_directory() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").expect("write file");

        assert!(matches!(
            ContentRoot::open(dir.path().join("missing")),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            ContentRoot::open(&file),
            Err(StoreError::NotADirectory(_))
        ));
    }
}
