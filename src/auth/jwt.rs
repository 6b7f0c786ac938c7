//! JWT token management
//!
//! Provides JWT token generation, validation and refresh functionality

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::types::JwtClaims;
use crate::config::AuthConfig;
use crate::error::Result;

/// JWT token manager
///
/// 所有令牌接受判定都必须经过 `validate_token`，不允许绕过签名校验。
pub struct JwtManager {
    /// Encoding key
    encoding_key: EncodingKey,
    /// Decoding key
    decoding_key: DecodingKey,
    /// Validation configuration
    validation: Validation,
    /// Authentication configuration
    config: Arc<AuthConfig>,
}

impl JwtManager {
    /// Create new JWT manager
    pub fn new(config: Arc<AuthConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&["gym-console"]);
        validation.set_audience(&["gym-console-users"]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 30; // 30 seconds tolerance

        Self {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Generate access token
    pub fn generate_access_token(
        &self,
        user_id: i32,
        username: String,
        is_admin: bool,
    ) -> Result<String> {
        let claims = JwtClaims::new(user_id, username, is_admin, self.config.jwt_expires_in);

        let header = Header::new(Algorithm::HS256);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| crate::internal_error!("Token generation failed: {}", e))
    }

    /// Generate refresh token
    pub fn generate_refresh_token(&self, user_id: i32, username: String) -> Result<String> {
        // Refresh tokens don't carry admin permissions
        let claims = JwtClaims::new(user_id, username, false, self.config.refresh_expires_in);

        let header = Header::new(Algorithm::HS256);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| crate::internal_error!("Token generation failed: {}", e))
    }

    /// Validate and parse token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        let token_data: TokenData<JwtClaims> = decode(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    crate::auth_error!("认证令牌已过期")
                }
                _ => crate::auth_error!("Token validation failed: {}", e),
            })?;

        let claims = token_data.claims;

        // Additional check for token expiration
        if claims.is_expired() {
            return Err(crate::auth_error!("认证令牌已过期"));
        }

        Ok(claims)
    }

    /// Refresh access token
    pub fn refresh_access_token(&self, refresh_token: &str, is_admin: bool) -> Result<String> {
        // Validate refresh token
        let claims = self.validate_token(refresh_token)?;

        let user_id = claims.user_id()?;

        // Generate new access token
        self.generate_access_token(user_id, claims.username, is_admin)
    }

    /// Generate token pair (access + refresh tokens)
    pub fn generate_token_pair(
        &self,
        user_id: i32,
        username: String,
        is_admin: bool,
    ) -> Result<TokenPair> {
        let access_token = self.generate_access_token(user_id, username.clone(), is_admin)?;

        let refresh_token = self.generate_refresh_token(user_id, username)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.jwt_expires_in,
        })
    }

    /// Get configuration reference
    #[must_use]
    pub fn get_config(&self) -> &AuthConfig {
        &self.config
    }
}

/// Token pair structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
    /// Token type
    pub token_type: String,
    /// Expires in seconds
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_manager() -> JwtManager {
        let config = Arc::new(AuthConfig {
            jwt_secret: "test-secret-key-for-jwt-testing".to_string(),
            jwt_expires_in: 3600,
            refresh_expires_in: 86400,
        });
        JwtManager::new(config)
    }

    #[test]
    fn test_token_generation_and_validation() {
        let manager = create_test_manager();

        let token = manager
            .generate_access_token(1, "frontdesk".to_string(), false)
            .unwrap();

        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 1);
        assert_eq!(claims.username, "frontdesk");
        assert!(!claims.is_admin);
    }

    #[test]
    fn test_refresh_token_flow() {
        let manager = create_test_manager();

        // Generate refresh token
        let refresh_token = manager
            .generate_refresh_token(1, "frontdesk".to_string())
            .unwrap();

        // Use refresh token to generate new access token
        let new_access_token = manager.refresh_access_token(&refresh_token, false).unwrap();

        let claims = manager.validate_token(&new_access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 1);
        assert_eq!(claims.username, "frontdesk");
    }

    #[test]
    fn test_token_pair_generation() {
        let manager = create_test_manager();

        let token_pair = manager
            .generate_token_pair(1, "admin".to_string(), true)
            .unwrap();

        // Validate access token
        let access_claims = manager.validate_token(&token_pair.access_token).unwrap();
        assert_eq!(access_claims.user_id().unwrap(), 1);
        assert!(access_claims.is_admin);

        // Validate refresh token
        let refresh_claims = manager.validate_token(&token_pair.refresh_token).unwrap();
        assert_eq!(refresh_claims.user_id().unwrap(), 1);
        assert!(!refresh_claims.is_admin); // Refresh tokens don't contain admin permissions
    }

    #[test]
    fn test_invalid_token() {
        let manager = create_test_manager();

        // Test invalid token
        let result = manager.validate_token("invalid-token");
        assert!(result.is_err());

        // Test empty token
        let result = manager.validate_token("");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = create_test_manager();
        let other = JwtManager::new(Arc::new(AuthConfig {
            jwt_secret: "another-secret-entirely".to_string(),
            jwt_expires_in: 3600,
            refresh_expires_in: 86400,
        }));

        let token = other
            .generate_access_token(7, "intruder".to_string(), true)
            .unwrap();

        assert!(manager.validate_token(&token).is_err());
    }
}
