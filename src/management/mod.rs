//! # 管理端模块
//!
//! 控制台 HTTP API：路由、处理器、响应封装与认证中间件

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod services;
