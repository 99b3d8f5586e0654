//! E-mail shape validation (no DNS/MX lookup)

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid e-mail pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("E-mail é obrigatório")]
    Required,

    #[error("E-mail inválido")]
    InvalidFormat,
}

impl EmailError {
    pub fn reason(&self) -> &'static str {
        match self {
            EmailError::Required => "obrigatorio",
            EmailError::InvalidFormat => "formato_invalido",
        }
    }
}

/// Validate an e-mail address and return it trimmed
pub fn validate_email(raw: Option<&str>) -> Result<String, EmailError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(EmailError::Required);
    }

    if !EMAIL_PATTERN.is_match(raw) {
        return Err(EmailError::InvalidFormat);
    }

    Ok(raw.to_string())
}
