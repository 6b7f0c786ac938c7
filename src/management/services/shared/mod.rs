//! # 共享服务工具

pub mod pagination;

pub use pagination::{
    PaginationInfo, PaginationParams, build_page, validate_email_format, validate_name_format,
};
