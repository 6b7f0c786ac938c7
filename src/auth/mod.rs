//! # 认证模块
//!
//! 控制台登录令牌的签发与验证，以及密码哈希工具

pub mod jwt;
pub mod types;
pub mod utils;

pub use jwt::{JwtManager, TokenPair};
pub use types::JwtClaims;
pub use utils::AuthUtils;
