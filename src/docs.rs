// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,
        handlers::auth::change_password,

        // --- Instructions ---
        handlers::instructions::list_instructions,
        handlers::instructions::submit_instructions,
        handlers::instructions::update_instruction,
        handlers::instructions::export_instructions,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,

        // --- Admin: Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::toggle_user_status,
        handlers::users::delete_user,

        // --- Admin: Mappings ---
        handlers::mappings::list_mappings,
        handlers::mappings::create_mapping,
        handlers::mappings::update_mapping,
        handlers::mappings::delete_mapping,

        // --- Admin: Settings / Data ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,
        handlers::settings::download_backup,
        handlers::settings::run_cleanup,

        // --- Logs ---
        handlers::logs::list_logs,

        // --- AI ---
        handlers::ai::summary,
        handlers::ai::polish,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::ChangePasswordPayload,

            // --- Instructions ---
            models::instruction::InstructionStatus,
            models::instruction::Instruction,
            models::instruction::SubmitRow,
            models::instruction::SubmitInstructionsPayload,
            models::instruction::SubmitResponse,
            models::instruction::UpdateInstructionPayload,
            models::instruction::InstructionListResponse,

            // --- Dashboard ---
            models::dashboard::KpiCounts,
            models::dashboard::TrendPoint,
            models::dashboard::UserStat,
            models::dashboard::DashboardData,

            // --- Mappings ---
            models::customer_code::CustomerCode,
            models::customer_code::CreateMappingPayload,
            models::customer_code::UpdateMappingPayload,

            // --- Settings / Data ---
            models::settings::AppSettings,
            models::settings::UpdateSettingsPayload,
            models::settings::BackupDocument,
            models::settings::CleanupResponse,

            // --- Logs ---
            models::activity_log::ActivityLog,

            // --- Payloads dos handlers ---
            handlers::users::CreateUserPayload,
            handlers::users::UpdateUserPayload,
            handlers::ai::PolishPayload,
            handlers::ai::AiTextResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e sessão"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Instructions", description = "Submissão e revisão de instruções de entrega"),
        (name = "Dashboard", description = "Indicadores e Gráficos"),
        (name = "Admin", description = "Usuários, mapeamentos, configuração e dados (Admin)"),
        (name = "Logs", description = "Trilha de auditoria"),
        (name = "AI", description = "Assistente de texto (best-effort)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
