//! Permission grant domain models
//!
//! A grant is the nested boolean structure embedded in the session token under
//! `permissoes`. Top-level entries are either plain flags (`"alunos": true`) or
//! groups of sub-capabilities (`"configuracoes": { "usuarios": true }`).
//! Everything not explicitly `true` is denied.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Well-known capability paths used by guards and the navigation menu
pub mod caps {
    pub const ALUNOS: &str = "alunos";
    pub const FILIAIS: &str = "filiais";
    pub const FLUXO_CAIXA: &str = "fluxo_caixa";
    pub const IMPORTACAO: &str = "importacao";
    pub const EXPORTACAO: &str = "exportacao";

    pub const CONFIGURACOES: &str = "configuracoes";
    pub const INFORMACOES_BANCARIAS: &str = "configuracoes.informacoes_bancarias";
    pub const PLANO_GYM_CONNECT: &str = "configuracoes.plano_gym_connect";
    pub const CONFIGURACOES_APP: &str = "configuracoes.configuracoes_app";
    pub const HISTORICO_USUARIO: &str = "configuracoes.historico_usuario";
    pub const USUARIOS: &str = "configuracoes.usuarios";
    pub const PERFIS: &str = "configuracoes.perfis";

    pub const PRECIFICACAO: &str = "precificacao";
    pub const PLANOS: &str = "precificacao.planos";

    pub const AJUSTE_FLUXO_CAIXA: &str = "ajuste_fluxo_caixa";
    pub const CATEGORIAS: &str = "ajuste_fluxo_caixa.categorias";
}

/// One node of a permission grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Leaf(bool),
    Group(BTreeMap<String, Capability>),
}

impl Capability {
    /// Decode a raw JSON value. Anything that is neither a boolean nor an
    /// object is a denied leaf.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(granted) => Capability::Leaf(*granted),
            Value::Object(children) => Capability::Group(
                children
                    .iter()
                    .map(|(name, child)| (name.clone(), Capability::from_value(child)))
                    .collect(),
            ),
            _ => Capability::Leaf(false),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Capability::Leaf(granted) => Value::Bool(*granted),
            Capability::Group(children) => Value::Object(
                children
                    .iter()
                    .map(|(name, child)| (name.clone(), child.to_value()))
                    .collect(),
            ),
        }
    }

    /// Only an explicit `true` leaf is granted; a group header never is.
    pub fn is_granted(&self) -> bool {
        matches!(self, Capability::Leaf(true))
    }
}

/// Decoded permission grant of one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct PermissionGrant {
    groups: BTreeMap<String, Capability>,
}

impl PermissionGrant {
    /// Grant that denies everything
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, group: &str) -> Option<&Capability> {
        self.groups.get(group)
    }

    /// Evaluate a parsed capability path.
    ///
    /// `"group"` is granted only when the group is a `true` leaf.
    /// `"group.sub"` is granted only when the group is a nested group whose
    /// `sub` entry is a `true` leaf; a boolean parent denies every child.
    pub fn evaluate(&self, path: &CapabilityPath) -> bool {
        match (self.groups.get(path.group()), path.sub()) {
            (Some(Capability::Leaf(granted)), None) => *granted,
            (Some(Capability::Group(children)), Some(sub)) => {
                children.get(sub).is_some_and(Capability::is_granted)
            }
            _ => false,
        }
    }

    /// `None` means the caller declares no requirement at all and is always
    /// allowed. A declared requirement must be granted explicitly.
    pub fn is_allowed(&self, requirement: Option<&CapabilityPath>) -> bool {
        match requirement {
            None => true,
            Some(path) => self.evaluate(path),
        }
    }

    /// Evaluate a dotted path given as text. Unparsable paths are denied.
    pub fn allows(&self, path: &str) -> bool {
        match path.parse::<CapabilityPath>() {
            Ok(path) => self.evaluate(&path),
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "Rejected malformed capability path");
                false
            }
        }
    }
}

impl From<Value> for PermissionGrant {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from(map),
            _ => Self::empty(),
        }
    }
}

impl From<Map<String, Value>> for PermissionGrant {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            groups: map
                .iter()
                .map(|(name, value)| (name.clone(), Capability::from_value(value)))
                .collect(),
        }
    }
}

impl From<PermissionGrant> for Value {
    fn from(grant: PermissionGrant) -> Self {
        Value::Object(
            grant
                .groups
                .iter()
                .map(|(name, capability)| (name.clone(), capability.to_value()))
                .collect(),
        )
    }
}

/// Errors raised when parsing a dotted capability path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("capability path is empty")]
    Empty,

    #[error("capability path `{0}` has an empty segment")]
    EmptySegment(String),

    #[error("capability path `{0}` has more than two segments")]
    TooDeep(String),
}

/// Dotted path of one or two segments: `"group"` or `"group.sub"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CapabilityPath {
    group: String,
    sub: Option<String>,
}

impl CapabilityPath {
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn sub(&self) -> Option<&str> {
        self.sub.as_deref()
    }
}

impl FromStr for CapabilityPath {
    type Err = PathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PathError::Empty);
        }

        let segments: Vec<&str> = raw.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PathError::EmptySegment(raw.to_string()));
        }

        match segments.as_slice() {
            [group] => Ok(Self {
                group: (*group).to_string(),
                sub: None,
            }),
            [group, sub] => Ok(Self {
                group: (*group).to_string(),
                sub: Some((*sub).to_string()),
            }),
            _ => Err(PathError::TooDeep(raw.to_string())),
        }
    }
}

impl TryFrom<String> for CapabilityPath {
    type Error = PathError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<CapabilityPath> for String {
    fn from(path: CapabilityPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for CapabilityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub {
            Some(sub) => write!(f, "{}.{}", self.group, sub),
            None => f.write_str(&self.group),
        }
    }
}
