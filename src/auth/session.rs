//! 请求会话
//! 每个请求根据 Bearer 令牌构建一个显式的会话对象，解码失败时退化为匿名会话

use super::jwt::{JwtService, SessionUser};
use crate::{
    error::AppError,
    models::{
        menu::{visible_menu, MenuItem},
        permission::PermissionGrant,
    },
};

/// Session of the current request
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<SessionUser>,
    grant: PermissionGrant,
}

impl Session {
    /// Session without identity; every declared permission is denied
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: SessionUser, grant: PermissionGrant) -> Self {
        Self {
            user: Some(user),
            grant,
        }
    }

    /// Build the session from an optional bearer token.
    ///
    /// Never fails: a missing or undecodable token yields the anonymous
    /// session. Decode failures are logged.
    pub fn from_bearer(jwt: &JwtService, token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Self::anonymous();
        };

        match jwt.decode(token) {
            Ok(claims) => Self::authenticated(claims.user, claims.permissoes),
            Err(e) => {
                tracing::warn!(error = %e, "Session token rejected, continuing without permissions");
                Self::anonymous()
            }
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Identity of the actor, or `Unauthorized` for anonymous sessions
    pub fn require_user(&self) -> Result<&SessionUser, AppError> {
        self.user.as_ref().ok_or(AppError::Unauthorized)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn grant(&self) -> &PermissionGrant {
        &self.grant
    }

    /// "Can this actor perform `path`?"
    pub fn can(&self, path: &str) -> bool {
        self.grant.allows(path)
    }

    pub fn menu(&self) -> Vec<MenuItem> {
        visible_menu(&self.grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anonymous_session_denies() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(!session.can("alunos"));
        assert!(session.grant().is_allowed(None));
        assert!(matches!(session.require_user(), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_authenticated_session() {
        let user = SessionUser {
            id_usuario: 1,
            id_empresa: 10,
            id_filial: None,
            id_perfil: 1,
            nome_usuario: "Admin".to_string(),
            email_usuario: "admin@gym.com".to_string(),
        };
        let session = Session::authenticated(user, PermissionGrant::from(json!({ "alunos": true })));

        assert!(session.can("alunos"));
        assert!(!session.can("filiais"));
        assert_eq!(session.require_user().unwrap().id_empresa, 10);
    }
}
