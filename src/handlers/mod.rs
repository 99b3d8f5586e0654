//! HTTP 处理器模块

pub mod audit;
pub mod health;
pub mod metrics;
pub mod session;
pub mod validation;
