//! Gym Connect 核心库
//! 权限判断、审计描述与记录、CPF/邮箱校验，以及对外暴露它们的 HTTP 服务

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod validation;
