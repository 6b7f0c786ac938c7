//! # 网关转发模块
//!
//! 将控制台发来的 `/api/proxy/{*path}` 请求原样转发到外部后端服务。
//! 无状态、单次尝试、不重试；上游响应按原状态码与 JSON 体回传。

pub mod forwarder;
pub mod handler;
pub mod upstream_url;

pub use forwarder::{CONNECT_FAILURE_MESSAGE, forward_to_upstream};
pub use upstream_url::build_target_url;
