//! 内容存储操作。
//!
//! 每个 HTTP 方法对应一个文件系统操作：读取、写入、批量创建与删除。

use std::fs::{self, DirBuilder, Metadata, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use fsd_api_types::{
    DirectoryData, DirectoryEntry, FileData, PostFileRequest, PutFileRequest, ResponseBody,
};
use fsd_core::{DeleteMode, Permissions};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::metadata::{child_url, classify, file_meta};
use crate::root::ContentRoot;

/// 读取路径的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// 普通文件及其内容。
    File(FileData),
    /// 目录及其直接子条目。
    Directory(DirectoryData),
}

impl From<Node> for ResponseBody {
    fn from(node: Node) -> Self {
        match node {
            Node::File(file) => Self::File(file),
            Node::Directory(directory) => Self::Directory(directory),
        }
    }
}

/// 已通过校验、等待写入的批量条目。
struct PendingFile {
    /// 目标文件路径。
    path: PathBuf,
    /// 写入后应用的权限位。
    permissions: Permissions,
    /// 文件内容。
    contents: String,
}

/// 以单个目录为根的内容存储。
///
/// 所有方法均为同步、无状态调用；文件系统是唯一的共享状态，
/// 多步骤操作之间不保证原子性。
#[derive(Debug, Clone)]
pub struct ContentStore {
    /// 内容根目录。
    root: ContentRoot,
}

impl ContentStore {
    /// 创建新的内容存储实例。
    pub fn new(root: ContentRoot) -> Self {
        Self { root }
    }

    /// 读取文件内容或列出目录。
    ///
    /// stat 成功之后的读取失败一律视为内部错误。
    pub fn read(&self, url_path: &str) -> Result<Node> {
        let path = self.root.resolve(url_path)?;
        let metadata = fs::metadata(&path).map_err(|e| StoreError::io("stat", &path, e))?;

        if metadata.is_file() {
            let bytes = fs::read(&path).map_err(|e| StoreError::internal("read", &path, e))?;
            debug!(path = %path.display(), size = bytes.len(), "read file");
            return Ok(Node::File(FileData {
                meta: file_meta(url_path, &metadata),
                contents: String::from_utf8_lossy(&bytes).into_owned(),
            }));
        }

        if metadata.is_dir() {
            return self
                .list_directory(url_path, &path, &metadata)
                .map(Node::Directory);
        }

        Err(StoreError::UnsupportedFileType)
    }

    /// 根据 `PutFileRequest` 请求体创建或覆盖单个文件。
    ///
    /// 缺失的父目录以 `0700` 权限递归创建。
    pub fn put_file(&self, url_path: &str, body: &[u8]) -> Result<FileData> {
        let path = self.root.resolve(url_path)?;
        let request: PutFileRequest = serde_json::from_slice(body)?;

        if let Some(parent) = path.parent() {
            create_directories(parent)?;
        }

        match fs::metadata(&path) {
            Ok(metadata) if !metadata.is_file() => {
                return Err(StoreError::NotAFile(path.display().to_string()));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io("stat", &path, e)),
        }

        let permissions = Permissions::parse(&request.permissions)
            .map_err(|_| StoreError::InvalidPermissions(path.display().to_string()))?;

        write_file(&path, request.contents.as_bytes(), permissions)?;
        info!(path = %path.display(), %permissions, "file written");

        let metadata = fs::metadata(&path).map_err(|e| StoreError::io("stat", &path, e))?;
        Ok(FileData {
            meta: file_meta(url_path, &metadata),
            contents: request.contents,
        })
    }

    /// 在目录中批量创建 `PostFileRequest` 数组描述的文件。
    ///
    /// 写入前先校验全部条目；写入失败时立即中止，已写入的文件保留，不回滚。
    pub fn create_files(&self, url_path: &str, body: &[u8]) -> Result<DirectoryData> {
        let path = self.root.resolve(url_path)?;

        match fs::metadata(&path) {
            Ok(metadata) if !metadata.is_dir() => {
                return Err(StoreError::NotADirectory(path.display().to_string()));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => create_directories(&path)?,
            Err(e) => return Err(StoreError::io("stat", &path, e)),
        }

        let requests: Vec<PostFileRequest> = serde_json::from_slice(body)?;
        let pending = requests
            .into_iter()
            .map(|request| validate_entry(&path, request))
            .collect::<Result<Vec<_>>>()?;

        for (written, file) in pending.iter().enumerate() {
            if let Err(err) = write_file(&file.path, file.contents.as_bytes(), file.permissions) {
                warn!(
                    dir = %path.display(),
                    written,
                    total = pending.len(),
                    error = %err,
                    "batch create stopped, earlier files were kept"
                );
                return Err(err);
            }
        }
        info!(dir = %path.display(), count = pending.len(), "batch files written");

        let metadata = fs::metadata(&path).map_err(|e| StoreError::io("stat", &path, e))?;
        self.list_directory(url_path, &path, &metadata)
    }

    /// 删除文件或目录。
    ///
    /// 符号链接本身被删除，不会跟随到目标。
    pub fn delete(&self, url_path: &str, mode: DeleteMode) -> Result<()> {
        let path = self.root.resolve(url_path)?;
        if self.root.is_root(&path) {
            return Err(StoreError::RootDeletion);
        }

        let metadata =
            fs::symlink_metadata(&path).map_err(|e| StoreError::io("remove", &path, e))?;

        let removed = match (metadata.is_dir(), mode) {
            (true, DeleteMode::Recursive) => fs::remove_dir_all(&path),
            (true, DeleteMode::Single) => fs::remove_dir(&path),
            (false, _) => fs::remove_file(&path),
        };
        removed.map_err(|e| StoreError::io("remove", &path, e))?;

        info!(path = %path.display(), recursive = mode.is_recursive(), "path deleted");
        Ok(())
    }

    /// 列出目录的直接子条目，按名称排序。
    fn list_directory(
        &self,
        url_path: &str,
        path: &Path,
        metadata: &Metadata,
    ) -> Result<DirectoryData> {
        let mut entries = Vec::new();
        let read_dir =
            fs::read_dir(path).map_err(|e| StoreError::internal("readdir", path, e))?;

        for entry in read_dir {
            let entry = entry.map_err(|e| StoreError::internal("readdir", path, e))?;
            // DirEntry::metadata 不会跟随符号链接
            let child = match entry.metadata() {
                Ok(child) => child,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %entry.path().display(), "entry vanished while listing");
                    continue;
                }
                Err(e) => return Err(StoreError::internal("lstat", &entry.path(), e)),
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(DirectoryEntry {
                meta: file_meta(&child_url(url_path, &name), &child),
                entry_type: classify(child.file_type()),
            });
        }

        entries.sort_by(|a, b| a.meta.name.cmp(&b.meta.name));
        debug!(path = %path.display(), count = entries.len(), "listed directory");

        Ok(DirectoryData {
            meta: file_meta(url_path, metadata),
            entries,
        })
    }
}

/// 校验批量条目的名称与权限。
fn validate_entry(dir: &Path, request: PostFileRequest) -> Result<PendingFile> {
    let name = request.name;
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\0']) {
        return Err(StoreError::InvalidName(name));
    }

    let path = dir.join(&name);
    let permissions = Permissions::parse(&request.permissions)
        .map_err(|_| StoreError::InvalidPermissions(path.display().to_string()))?;

    Ok(PendingFile {
        path,
        permissions,
        contents: request.contents,
    })
}

/// 以 `0700` 权限递归创建目录。
fn create_directories(path: &Path) -> Result<()> {
    DirBuilder::new()
        .recursive(true)
        .mode(Permissions::IMPLICIT_DIRECTORY.mode())
        .create(path)
        .map_err(|e| StoreError::io("mkdir", path, e))
}

/// 写入内容后精确设置权限位，不受 umask 影响。
fn write_file(path: &Path, contents: &[u8], permissions: Permissions) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(permissions.mode())
        .open(path)
        .map_err(|e| StoreError::io("open", path, e))?;

    file.write_all(contents)
        .map_err(|e| StoreError::io("write", path, e))?;

    file.set_permissions(fs::Permissions::from_mode(permissions.mode()))
        .map_err(|e| StoreError::io("chmod", path, e))
}
