//! CPF (Cadastro de Pessoas Físicas) validation

use serde::Serialize;
use std::fmt;
use thiserror::Error;

const CPF_LENGTH: usize = 11;

/// Reasons a CPF is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaxIdError {
    #[error("CPF é obrigatório")]
    Required,

    #[error("CPF deve conter 11 dígitos")]
    InvalidLength,

    #[error("CPF não pode ser uma sequência de dígitos repetidos")]
    RepeatedDigits,

    #[error("CPF inválido: dígitos verificadores não conferem")]
    ChecksumMismatch,
}

impl TaxIdError {
    /// Stable machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            TaxIdError::Required => "obrigatorio",
            TaxIdError::InvalidLength => "tamanho_invalido",
            TaxIdError::RepeatedDigits => "sequencia_repetida",
            TaxIdError::ChecksumMismatch => "digito_verificador",
        }
    }
}

/// A CPF that passed validation, normalized to its 11 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// `000.000.000-00`
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a CPF. Punctuation and whitespace are ignored.
pub fn validate_tax_id(raw: Option<&str>) -> Result<Cpf, TaxIdError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(TaxIdError::Required);
    }

    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != CPF_LENGTH {
        return Err(TaxIdError::InvalidLength);
    }

    if digits.iter().all(|d| *d == digits[0]) {
        return Err(TaxIdError::RepeatedDigits);
    }

    let first = check_digit(&digits[..9]);
    let second = check_digit(&digits[..10]);
    if first != digits[9] || second != digits[10] {
        return Err(TaxIdError::ChecksumMismatch);
    }

    Ok(Cpf(digits.iter().map(|d| char::from(b'0' + *d as u8)).collect()))
}

/// Weighted mod-11 check digit. Weights run from `len + 1` down to 2.
fn check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .zip((2..=top).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();

    match (sum * 10) % 11 {
        10 => 0,
        d => d,
    }
}
