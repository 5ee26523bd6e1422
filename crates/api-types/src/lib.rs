//! Shared request/response types used by API-facing crates.
//!
//! Every response the service writes is a [`ResponseBody`]; its JSON form is
//! `{"status": ..., "type": ..., "<type>": payload}`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Metadata shared by files, directories and directory entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    /// URL path as requested, always with a leading `/`.
    pub path: String,
    /// Numeric uid rendered in decimal.
    pub owner: String,
    /// Permission bits as an octal string with a leading `0`, e.g. `0644`.
    pub permissions: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    #[serde(flatten)]
    pub meta: FileMeta,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryData {
    #[serde(flatten)]
    pub meta: FileMeta,
    pub entries: Vec<DirectoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    pub meta: FileMeta,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
}

/// Kind of a directory child, taken from its own mode (symlinks are not followed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
    Symlink,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    pub code: u16,
    pub error: String,
}

/// Body of `PUT /path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutFileRequest {
    pub permissions: String,
    #[serde(default)]
    pub contents: String,
}

/// One element of the `POST /dir` body array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFileRequest {
    pub name: String,
    pub permissions: String,
    #[serde(default)]
    pub contents: String,
}

/// Tagged response union. Exactly one payload is carried per variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    File(FileData),
    Directory(DirectoryData),
    Deleted,
    Error(ErrorData),
}

impl ResponseBody {
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self::Error(ErrorData {
            code,
            error: message.into(),
        })
    }

    /// Value of the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Directory(_) => "directory",
            Self::Deleted => "deleted",
            Self::Error(_) => "error",
        }
    }

    /// Value of the `status` field.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Error(_) => "error",
            _ => "ok",
        }
    }

    /// HTTP status code the body should be sent with.
    pub fn code(&self) -> u16 {
        match self {
            Self::Error(err) => err.code,
            _ => 200,
        }
    }
}

impl Serialize for ResponseBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if matches!(self, Self::Deleted) { 2 } else { 3 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("status", self.status())?;
        map.serialize_entry("type", self.kind())?;
        match self {
            Self::File(file) => map.serialize_entry("file", file)?,
            Self::Directory(directory) => map.serialize_entry("directory", directory)?,
            Self::Deleted => {}
            Self::Error(error) => map.serialize_entry("error", error)?,
        }
        map.end()
    }
}
