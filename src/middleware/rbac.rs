// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, models::auth::{Role, User}};

/// As ações que um perfil pode executar. A tabela perfil -> capacidades
/// fica toda em `role_allows`; nenhuma tela reimplementa checagem de perfil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    SubmitInstructions,
    UpdateInstructionProgress, // status e atualização rápida
    EditSalesComments,
    EditCommercialComments,
    ManageUsers,
    ManageMappings,
    ManageSettings,
    ViewActivityLogs,
    ExportBackup,
    RunCleanup,
    ViewTeamStats, // gráfico por usuário de vendas
}

pub fn role_allows(role: Role, cap: Capability) -> bool {
    use Capability::*;
    match cap {
        SubmitInstructions => matches!(role, Role::Admin | Role::Sales),
        UpdateInstructionProgress => matches!(role, Role::Admin | Role::Commercial),
        EditSalesComments => matches!(role, Role::Admin | Role::Sales),
        EditCommercialComments => matches!(role, Role::Admin | Role::Commercial),
        ManageUsers | ManageMappings | ManageSettings | ViewActivityLogs | ExportBackup
        | RunCleanup => matches!(role, Role::Admin),
        ViewTeamStats => matches!(role, Role::Admin | Role::Commercial),
    }
}

/// 1. O Trait que define o que é uma capacidade exigida por uma rota
pub trait CapabilityDef: Send + Sync + 'static {
    fn required() -> Capability;

    // Usado na mensagem de erro 403
    fn action() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequireCapability<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireCapability<T>
where
    T: CapabilityDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai o usuário colocado pelo auth_guard
        let user = parts.extensions.get::<User>().ok_or(AppError::InvalidToken)?;

        // B. Checa a tabela de capacidades
        if !role_allows(user.role, T::required()) {
            return Err(AppError::Forbidden(T::action()));
        }

        Ok(RequireCapability(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS CAPACIDADES (TIPOS)
// ---

macro_rules! capability_marker {
    ($name:ident, $cap:ident, $action:literal) => {
        pub struct $name;
        impl CapabilityDef for $name {
            fn required() -> Capability {
                Capability::$cap
            }
            fn action() -> &'static str {
                $action
            }
        }
    };
}

capability_marker!(CapSubmitInstructions, SubmitInstructions, "submit instructions");
capability_marker!(CapManageUsers, ManageUsers, "manage users");
capability_marker!(CapManageMappings, ManageMappings, "manage customer code mappings");
capability_marker!(CapManageSettings, ManageSettings, "change system settings");
capability_marker!(CapViewActivityLogs, ViewActivityLogs, "view activity logs");
capability_marker!(CapExportBackup, ExportBackup, "export backups");
capability_marker!(CapRunCleanup, RunCleanup, "run data cleanup");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sales_capabilities() {
        assert!(role_allows(Role::Sales, Capability::SubmitInstructions));
        assert!(role_allows(Role::Sales, Capability::EditSalesComments));
        assert!(!role_allows(Role::Sales, Capability::UpdateInstructionProgress));
        assert!(!role_allows(Role::Sales, Capability::EditCommercialComments));
        assert!(!role_allows(Role::Sales, Capability::ManageUsers));
        assert!(!role_allows(Role::Sales, Capability::ViewTeamStats));
    }

    #[test]
    fn commercial_capabilities() {
        assert!(role_allows(Role::Commercial, Capability::UpdateInstructionProgress));
        assert!(role_allows(Role::Commercial, Capability::EditCommercialComments));
        assert!(role_allows(Role::Commercial, Capability::ViewTeamStats));
        assert!(!role_allows(Role::Commercial, Capability::SubmitInstructions));
        assert!(!role_allows(Role::Commercial, Capability::EditSalesComments));
        assert!(!role_allows(Role::Commercial, Capability::ViewActivityLogs));
    }

    #[test]
    fn admin_has_everything() {
        for cap in [
            Capability::SubmitInstructions,
            Capability::UpdateInstructionProgress,
            Capability::EditSalesComments,
            Capability::EditCommercialComments,
            Capability::ManageUsers,
            Capability::ManageMappings,
            Capability::ManageSettings,
            Capability::ViewActivityLogs,
            Capability::ExportBackup,
            Capability::RunCleanup,
            Capability::ViewTeamStats,
        ] {
            assert!(role_allows(Role::Admin, cap));
        }
    }
}
