//! 权限检查服务
//! 基于会话中的权限授予进行判断，本身无状态

use crate::{
    auth::Session,
    error::AppError,
    models::menu::MenuItem,
};

#[derive(Debug, Default, Clone)]
pub struct PermissionService;

impl PermissionService {
    pub fn new() -> Self {
        Self
    }

    /// 检查会话是否拥有权限
    pub fn check_permission(&self, session: &Session, path: &str) -> bool {
        session.can(path)
    }

    /// 检查权限，如果无权限则返回错误
    ///
    /// 匿名会话返回 `Unauthorized`，已认证但未授予返回 `Forbidden`。
    pub fn require_permission(&self, session: &Session, path: &str) -> Result<(), AppError> {
        let user = session.require_user()?;

        if !session.can(path) {
            tracing::warn!(
                id_usuario = user.id_usuario,
                id_empresa = user.id_empresa,
                capability = %path,
                "Permission denied"
            );
            return Err(AppError::Forbidden);
        }

        Ok(())
    }

    /// 获取当前会话可见的导航菜单
    pub fn visible_menu(&self, session: &Session) -> Vec<MenuItem> {
        session.menu()
    }
}
