//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::models::StaffRole;
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "roster-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "roster-clients".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 员工 ID (Subject)
    pub sub: String,
    /// 显示名
    pub name: String,
    /// 角色
    pub role: String,
    /// 令牌类型
    pub token_type: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
fn generate_printable_jwt_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut key = String::new();

    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            // 如果随机数生成失败，使用固定的安全密钥
            return "RosterServerDevelopmentSecureKey2026!".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.chars().nth(idx).unwrap());
    }

    key
}

/// 从环境变量安全地加载 JWT 密钥
fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        Ok(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET is too short (<32 chars), generating a temporary key");
                generate_printable_jwt_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("🚨 FATAL: JWT_SECRET must be at least 32 characters long");
            }
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "⚠️  JWT_SECRET not set! Generating secure temporary key for development."
                );
                generate_printable_jwt_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("🚨 FATAL: JWT_SECRET environment variable must be set in production!");
            }
        }
    }
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为员工生成新令牌
    pub fn generate_token(
        &self,
        staff_id: i64,
        name: &str,
        role: StaffRole,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: staff_id.to_string(),
            name: name.to_string(),
            role: role.as_str().to_string(),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求处理函数
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 员工 ID
    pub id: i64,
    /// 显示名
    pub name: String,
    /// 角色
    pub role: StaffRole,
}

impl CurrentUser {
    /// Claims 中的 sub/role 均为字符串；解析失败视为无效令牌
    pub fn from_claims(claims: Claims) -> Result<Self, JwtError> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken(format!("Invalid subject: {}", claims.sub)))?;
        let role = StaffRole::parse(&claims.role)
            .ok_or_else(|| JwtError::InvalidToken(format!("Unknown role: {}", claims.role)))?;
        Ok(Self {
            id,
            name: claims.name,
            role,
        })
    }

    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }

    /// 管理员或店长
    pub fn can_manage(&self) -> bool {
        self.role.can_manage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-long-enough!".to_string(),
            expiration_minutes: 60,
            issuer: "roster-server".to_string(),
            audience: "roster-clients".to_string(),
        })
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = test_service();

        let token = service
            .generate_token(42, "Mia", StaffRole::Barista)
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.name, "Mia");
        assert_eq!(claims.role, "BARISTA");

        let user = CurrentUser::from_claims(claims).expect("claims should parse");
        assert_eq!(user.id, 42);
        assert_eq!(user.role, StaffRole::Barista);
        assert!(!user.can_manage());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let service = test_service();
        let token = service
            .generate_token(7, "Lee", StaffRole::Manager)
            .unwrap();
        let mut claims = service.validate_token(&token).unwrap();
        claims.role = "SUPERVISOR".to_string();
        assert!(CurrentUser::from_claims(claims).is_err());
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let service = test_service();
        let other = JwtService::with_config(JwtConfig {
            audience: "someone-else".to_string(),
            ..service.config.clone()
        });
        let token = other.generate_token(7, "Lee", StaffRole::Manager).unwrap();
        assert!(service.validate_token(&token).is_err());
    }
}
