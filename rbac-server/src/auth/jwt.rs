//! JWT 令牌服务
//!
//! 访问令牌的签发、验证和声明读取。
//! 令牌是无状态的：有效性只取决于签名、签发者/受众和过期时间，没有吊销列表。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (至少 32 字节)
    pub secret: String,
    /// 访问令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_SECRET_LEN: usize = 32;

impl JwtConfig {
    /// 从环境变量加载
    ///
    /// | 环境变量 | 默认值 |
    /// |----------|--------|
    /// | JWT_SECRET | debug 构建自动生成，release 构建必填 |
    /// | JWT_EXPIRATION_MINUTES | 15 |
    /// | JWT_ISSUER | rbac-server |
    /// | JWT_AUDIENCE | rbac-clients |
    pub fn from_env() -> Result<Self, JwtError> {
        Ok(Self {
            secret: load_jwt_secret()?,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(15),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "rbac-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "rbac-clients".to_string()),
        })
    }

    /// Config with an explicit secret and default TTL/issuer/audience
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: 15,
            issuer: "rbac-server".to_string(),
            audience: "rbac-clients".to_string(),
        }
    }
}

/// 存储在访问令牌中的 JWT Claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 登录名 (Subject)
    pub sub: String,
    /// 显示名称
    pub name: String,
    /// 角色 ID
    #[serde(rename = "roleId")]
    pub role_id: i64,
    /// 签发时间戳 (秒)
    pub iat: i64,
    /// 过期时间戳 (秒)
    pub exp: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// Identity-specific part of the claim set, the codec adds the rest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub name: String,
    pub role_id: i64,
}

/// 令牌验证/签发错误
#[derive(Error, Debug)]
pub enum TokenError {
    /// Structure could not be parsed, or issuer/audience mismatch
    #[error("无效令牌: {0}")]
    Malformed(String),

    #[error("无效签名")]
    BadSignature,

    /// Signature valid but `now > exp`; carries the decoded claims for auditing
    #[error("令牌已过期 (sub={})", .0.sub)]
    Expired(Box<Claims>),

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// JWT 配置错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("密钥生成失败: {0}")]
    KeyGenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_secure_printable_jwt_secret() -> Result<String, JwtError> {
    const ALLOWED_CHARS: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes).map_err(|_| {
        JwtError::KeyGenerationFailed("Failed to generate secure random key".to_string())
    })?;

    Ok(bytes
        .iter()
        .map(|b| ALLOWED_CHARS[(*b as usize) % ALLOWED_CHARS.len()] as char)
        .collect())
}

/// 从环境变量安全地加载 JWT 密钥
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < MIN_SECRET_LEN {
                return Err(JwtError::ConfigError(format!(
                    "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
                )));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "⚠️  JWT_SECRET not set! Generating secure temporary key for development."
                );
                generate_secure_printable_jwt_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production!".to_string(),
                ))
            }
        }
    }
}

/// JWT 令牌服务
///
/// HS256，同一个对称密钥负责签名和验证。
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("expiration_minutes", &self.config.expiration_minutes)
            .finish_non_exhaustive()
    }
}

impl JwtService {
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

    /// 访问令牌有效期
    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.config.expiration_minutes)
    }

    /// 签发令牌：`iat = now`, `exp = now + ttl`
    pub fn issue(
        &self,
        subject: &str,
        identity: &IdentityClaims,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            name: identity.name.clone(),
            role_id: identity.role_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::GenerationFailed(e.to_string()))
    }

    /// 使用配置的有效期签发访问令牌
    pub fn issue_access_token(
        &self,
        subject: &str,
        identity: &IdentityClaims,
    ) -> Result<String, TokenError> {
        self.issue(subject, identity, self.access_ttl())
    }

    fn validation(&self, check_exp: bool) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = check_exp;
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);
        validation
    }

    /// 验证并解码令牌
    ///
    /// 过期判断为 `now > exp`，不做时钟偏移补偿。
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation(true)) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => {
                    // Signature already checked; decode again without the exp check to recover claims
                    let data =
                        decode::<Claims>(token, &self.decoding_key, &self.validation(false))
                            .map_err(|e| TokenError::Malformed(e.to_string()))?;
                    Err(TokenError::Expired(Box::new(data.claims)))
                }
                ErrorKind::InvalidSignature => Err(TokenError::BadSignature),
                _ => Err(TokenError::Malformed(e.to_string())),
            },
        }
    }

    /// 读取签名有效令牌中的单个声明 (允许已过期)
    ///
    /// 仅用于登出和审计，不能用于授权。
    pub fn extract_claim(&self, token: &str, key: &str) -> Option<Value> {
        decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation(false))
            .ok()
            .and_then(|data| data.claims.get(key).cloned())
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建并注入请求扩展。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// 登录名
    pub username: String,
    /// 显示名称
    pub display_name: String,
    /// 角色 ID
    pub role_id: i64,
    /// 访问令牌过期时间 (秒)
    pub expires_at: i64,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            display_name: claims.name,
            role_id: claims.role_id,
            expires_at: claims.exp,
        }
    }
}
