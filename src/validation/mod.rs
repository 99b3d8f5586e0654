//! 值校验
//! CPF 与邮箱校验，前后端共用同一套规则

pub mod email;
pub mod tax_id;

pub use email::{validate_email, EmailError};
pub use tax_id::{validate_tax_id, Cpf, TaxIdError};
