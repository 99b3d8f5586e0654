//! 数据模型模块

pub mod audit;
pub mod menu;
pub mod permission;
