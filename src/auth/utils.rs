//! # 认证工具函数

use bcrypt::{DEFAULT_COST, hash, verify};
use rand::{Rng, distributions::Alphanumeric};

use crate::error::Result;

/// 认证工具集合
pub struct AuthUtils;

impl AuthUtils {
    /// 从 `Authorization` 头中提取 Bearer Token
    ///
    /// 前缀大小写不敏感，token 两端空白被裁剪；空 token 视为缺失。
    #[must_use]
    pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
        let auth_header = auth_header.trim();
        let prefix = "Bearer ";
        if auth_header.len() > prefix.len()
            && auth_header[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            let token = auth_header[prefix.len()..].trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
        None
    }

    /// 生成随机 salt
    #[must_use]
    pub fn generate_salt() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect()
    }

    /// 哈希密码
    pub fn hash_password(password: &str) -> Result<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| crate::internal_error!("Failed to hash password: {}", e))
    }

    /// 验证密码
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
        verify(password, password_hash)
            .map_err(|e| crate::internal_error!("Failed to verify password: {}", e))
    }
}
