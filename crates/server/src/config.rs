//! 服务端配置。

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
type Result<T> = anyhow::Result<T>;

/// 指定 TOML 配置文件路径的环境变量（可选）。
pub const CONFIG_ENV: &str = "FSD_CONFIG";
/// 覆盖内容根目录的环境变量。
pub const CONTENT_ROOT_ENV: &str = "FSD_CONTENT_ROOT";
/// 覆盖监听地址的环境变量。
pub const LISTEN_ADDR_ENV: &str = "FSD_LISTEN_ADDR";

/// 服务端配置，启动时加载一次。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// 通过 HTTP 暴露的内容根目录。
    #[serde(default = "default_content_root")]
    pub content_root: PathBuf,
    /// 监听地址。
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl ServerConfig {
    /// 加载 `FSD_CONFIG` 指定的配置文件（如果设置），
    /// 再应用 `FSD_CONTENT_ROOT` 与 `FSD_LISTEN_ADDR` 覆盖。
    pub fn load() -> Result<Self> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// 从 TOML 文件加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// 从 TOML 字符串解析配置。
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }

    /// 用已设置且非空的环境变量覆盖对应字段。
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(root) = lookup(CONTENT_ROOT_ENV).filter(|v| !v.is_empty()) {
            self.content_root = PathBuf::from(root);
        }
        if let Some(addr) = lookup(LISTEN_ADDR_ENV).filter(|v| !v.is_empty()) {
            self.listen_addr = addr;
        }
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_content_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let raw = r#"
content_root = "/srv/data"
listen_addr = "0.0.0.0:9000"
"#;

        let config = ServerConfig::from_str(raw).expect("config should parse");
        assert_eq!(config.content_root, PathBuf::from("/srv/data"));
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = ServerConfig::from_str("").expect("empty config should parse");
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.content_root, PathBuf::from("."));
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::default().with_overrides(|key| match key {
            CONTENT_ROOT_ENV => Some("/tmp/served".to_string()),
            LISTEN_ADDR_ENV => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.content_root, PathBuf::from("/tmp/served"));
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = ServerConfig::from_str("listen_addr = 8080").expect_err("wrong type");
        assert!(err.to_string().contains("server config"));
    }
}
