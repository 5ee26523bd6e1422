//! fsd 服务端：通过 HTTP 暴露内容根目录下的文件树。

pub mod api;
pub mod config;

pub use api::{AppState, build_router};
pub use config::ServerConfig;
