//! # 认证相关类型定义

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// JWT 令牌声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// 用户ID（字符串形式的 subject）
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 是否管理员
    pub is_admin: bool,
    /// 签发方
    pub iss: String,
    /// 受众
    pub aud: String,
    /// 过期时间（Unix 秒）
    pub exp: i64,
    /// 签发时间（Unix 秒）
    pub iat: i64,
    /// 唯一标识
    pub jti: String,
}

impl JwtClaims {
    /// 创建新的令牌声明
    #[must_use]
    pub fn new(user_id: i32, username: String, is_admin: bool, expires_in: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            username,
            is_admin,
            iss: "gym-console".to_string(),
            aud: "gym-console-users".to_string(),
            exp: now + expires_in,
            iat: now,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// 解析用户ID
    pub fn user_id(&self) -> Result<i32> {
        self.sub
            .parse::<i32>()
            .map_err(|_| crate::auth_error!("令牌中的用户ID无效: {}", self.sub))
    }

    /// 是否已过期
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}
