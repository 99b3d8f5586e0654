//! Session token issuance and decoding
//! HS256 签名的会话令牌，载荷中携带权限授予

use crate::{config::AppConfig, error::AppError, models::permission::PermissionGrant};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of the authenticated actor, as carried in the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id_usuario: i64,
    pub id_empresa: i64,
    pub id_filial: Option<i64>,
    pub id_perfil: i64,
    pub nome_usuario: String,
    pub email_usuario: String,
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub user: SessionUser,

    /// Permission grant of the user's profile
    #[serde(default)]
    pub permissoes: PermissionGrant,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

/// Reasons a session token could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("session token is missing")]
    Missing,

    #[error("session token has expired")]
    Expired,

    #[error("session token signature is invalid")]
    InvalidSignature,

    #[error("session token is malformed: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => DecodeError::Expired,
            ErrorKind::InvalidSignature => DecodeError::InvalidSignature,
            _ => DecodeError::Malformed(e.to_string()),
        }
    }
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_exp_secs: u64,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // HS256 需要至少 32 字节的密钥
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_token_exp_secs: config.security.access_token_exp_secs,
        })
    }

    /// Issue a session token for a user and its permission grant
    pub fn issue(&self, user: &SessionUser, grant: &PermissionGrant) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::seconds(self.access_token_exp_secs as i64);

        let claims = SessionClaims {
            user: user.clone(),
            permissoes: grant.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        self.encode_claims(&claims)
    }

    /// Sign arbitrary claims
    pub fn encode_claims(&self, claims: &SessionClaims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {:?}", e);
            AppError::Internal(format!("Failed to encode session token: {}", e))
        })
    }

    /// Validate signature and expiry, then decode the claims
    pub fn decode(&self, token: &str) -> Result<SessionClaims, DecodeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DecodeError::Missing);
        }

        Ok(decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;
    use serde_json::json;

    fn test_config() -> AppConfig {
        AppConfig {
            server: crate::config::ServerConfig {
                addr: "127.0.0.1:3333".to_string(),
                graceful_shutdown_timeout_secs: 30,
                cors_allowed_origins: None,
                max_body_bytes: 1024 * 1024,
            },
            database: crate::config::DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 600,
                max_lifetime_secs: 1800,
            },
            logging: crate::config::LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            security: crate::config::SecurityConfig {
                jwt_secret: Secret::new("test_secret_key_32_characters_long!".to_string()),
                access_token_exp_secs: 900,
            },
        }
    }

    fn test_user() -> SessionUser {
        SessionUser {
            id_usuario: 7,
            id_empresa: 1,
            id_filial: Some(3),
            id_perfil: 2,
            nome_usuario: "Ana".to_string(),
            email_usuario: "ana@academia.com".to_string(),
        }
    }

    #[test]
    fn test_issue_and_decode() {
        let service = JwtService::from_config(&test_config()).unwrap();
        let grant = PermissionGrant::from(json!({
            "alunos": true,
            "configuracoes": { "usuarios": true }
        }));

        let token = service.issue(&test_user(), &grant).unwrap();
        let claims = service.decode(&token).unwrap();

        assert_eq!(claims.user, test_user());
        assert_eq!(claims.permissoes, grant);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::from_config(&test_config()).unwrap();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            user: test_user(),
            permissoes: PermissionGrant::empty(),
            iat: now - 7200,
            exp: now - 3600,
        };

        let token = service.encode_claims(&claims).unwrap();
        assert!(matches!(service.decode(&token), Err(DecodeError::Expired)));
    }

    #[test]
    fn test_garbage_and_missing_tokens() {
        let service = JwtService::from_config(&test_config()).unwrap();
        assert!(matches!(service.decode(""), Err(DecodeError::Missing)));
        assert!(matches!(service.decode("not-a-token"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = test_config();
        config.security.jwt_secret = Secret::new("short".to_string());
        assert!(JwtService::from_config(&config).is_err());
    }
}
