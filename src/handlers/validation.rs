//! CPF 与邮箱校验的 HTTP 处理器

use crate::validation::{validate_email, validate_tax_id};
use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ValidationRequest {
    pub valor: Option<String>,
}

/// 校验结果；无效时携带原因，有效时携带规范化后的值
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valido: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivo: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<String>,
}

impl ValidationResponse {
    fn valid(valor: String) -> Self {
        Self {
            valido: true,
            valor: Some(valor),
            motivo: None,
            mensagem: None,
        }
    }

    fn invalid(motivo: &'static str, mensagem: String) -> Self {
        Self {
            valido: false,
            valor: None,
            motivo: Some(motivo),
            mensagem: Some(mensagem),
        }
    }
}

/// 校验 CPF
pub async fn validate_cpf(Json(req): Json<ValidationRequest>) -> impl IntoResponse {
    let response = match validate_tax_id(req.valor.as_deref()) {
        Ok(cpf) => ValidationResponse::valid(cpf.into_inner()),
        Err(e) => ValidationResponse::invalid(e.reason(), e.to_string()),
    };

    Json(response)
}

/// 校验邮箱
pub async fn validate_email_address(Json(req): Json<ValidationRequest>) -> impl IntoResponse {
    let response = match validate_email(req.valor.as_deref()) {
        Ok(email) => ValidationResponse::valid(email),
        Err(e) => ValidationResponse::invalid(e.reason(), e.to_string()),
    };

    Json(response)
}
