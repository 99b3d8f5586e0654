//! Navigation menu model
//! 前端导航菜单定义及按权限过滤

use once_cell::sync::Lazy;
use serde::Serialize;

use super::permission::{caps, CapabilityPath, PermissionGrant};

/// Navigation entry. `permission: None` means the entry is always visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: String,
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<CapabilityPath>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    // 只在 NAVIGATION 初始化时调用；权限常量无法解析时直接失败，不能退化为无需权限
    fn leaf(label: &str, route: &str, permission: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            route: route.to_string(),
            permission: permission.map(|p| {
                p.parse()
                    .unwrap_or_else(|e| panic!("invalid menu capability `{}`: {}", p, e))
            }),
            children: Vec::new(),
        }
    }

    fn section(label: &str, route: &str, children: Vec<MenuItem>) -> Self {
        Self {
            label: label.to_string(),
            route: route.to_string(),
            permission: None,
            children,
        }
    }

    /// Filter this entry against a grant. Sections survive only when at
    /// least one child does.
    fn visible_for(&self, grant: &PermissionGrant) -> Option<MenuItem> {
        if !grant.is_allowed(self.permission.as_ref()) {
            return None;
        }

        if self.children.is_empty() {
            return Some(self.clone());
        }

        let children: Vec<MenuItem> = self
            .children
            .iter()
            .filter_map(|child| child.visible_for(grant))
            .collect();

        if children.is_empty() {
            None
        } else {
            Some(MenuItem {
                children,
                ..self.clone()
            })
        }
    }
}

static NAVIGATION: Lazy<Vec<MenuItem>> = Lazy::new(|| {
    vec![
        MenuItem::leaf("Dashboard", "/dashboard", None),
        MenuItem::leaf("Alunos", "/alunos", Some(caps::ALUNOS)),
        MenuItem::leaf("Filiais", "/filiais", Some(caps::FILIAIS)),
        MenuItem::leaf("Fluxo de caixa", "/fluxo-caixa", Some(caps::FLUXO_CAIXA)),
        MenuItem::section(
            "Ajuste de fluxo de caixa",
            "/ajuste-fluxo-caixa",
            vec![MenuItem::leaf(
                "Categorias",
                "/ajuste-fluxo-caixa/categorias",
                Some(caps::CATEGORIAS),
            )],
        ),
        MenuItem::section(
            "Precificação",
            "/precificacao",
            vec![MenuItem::leaf("Planos", "/precificacao/planos", Some(caps::PLANOS))],
        ),
        MenuItem::leaf("Importação", "/importacao", Some(caps::IMPORTACAO)),
        MenuItem::leaf("Exportação", "/exportacao", Some(caps::EXPORTACAO)),
        MenuItem::section(
            "Configurações",
            "/configuracoes",
            vec![
                MenuItem::leaf(
                    "Informações bancárias",
                    "/configuracoes/informacoes-bancarias",
                    Some(caps::INFORMACOES_BANCARIAS),
                ),
                MenuItem::leaf(
                    "Plano Gym Connect",
                    "/configuracoes/plano",
                    Some(caps::PLANO_GYM_CONNECT),
                ),
                MenuItem::leaf(
                    "Configurações do app",
                    "/configuracoes/app",
                    Some(caps::CONFIGURACOES_APP),
                ),
                MenuItem::leaf(
                    "Histórico de usuário",
                    "/configuracoes/historico",
                    Some(caps::HISTORICO_USUARIO),
                ),
                MenuItem::leaf("Usuários", "/configuracoes/usuarios", Some(caps::USUARIOS)),
                MenuItem::leaf("Perfis", "/configuracoes/perfis", Some(caps::PERFIS)),
            ],
        ),
    ]
});

/// Full navigation tree, unfiltered
pub fn navigation() -> &'static [MenuItem] {
    &NAVIGATION
}

/// Navigation entries the grant allows
pub fn visible_menu(grant: &PermissionGrant) -> Vec<MenuItem> {
    NAVIGATION
        .iter()
        .filter_map(|item| item.visible_for(grant))
        .collect()
}
