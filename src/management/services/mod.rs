//! # 管理端服务层
//!
//! 聚合供各 HTTP handler 复用的共享工具。

pub mod shared;

pub use shared::{
    PaginationInfo, PaginationParams, build_page, validate_email_format, validate_name_format,
};
