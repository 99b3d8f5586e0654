//! Business logic services layer

pub mod audit_service;
pub mod permission_service;

pub use audit_service::AuditService;
pub use permission_service::PermissionService;
