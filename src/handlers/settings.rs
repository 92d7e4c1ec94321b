// src/handlers/settings.rs
//
// Abas "Config" e "Data" das configurações (somente Admin):
// janela de cutoff, retenção, backup JSON e limpeza manual.

use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::{Local, Utc};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CapExportBackup, CapManageSettings, CapRunCleanup, RequireCapability},
    },
    models::settings::{AppSettings, BackupDocument, CleanupResponse, UpdateSettingsPayload},
};

// GET /api/admin/settings
#[utoipa::path(
    get,
    path = "/api/admin/settings",
    tag = "Admin",
    responses(
        (status = 200, description = "Configuração global", body = AppSettings)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapManageSettings>,
) -> Result<Json<AppSettings>, AppError> {
    let settings = app_state.settings_repo.get_from_pool().await?;
    Ok(Json(settings))
}

// PUT /api/admin/settings
#[utoipa::path(
    put,
    path = "/api/admin/settings",
    tag = "Admin",
    request_body = UpdateSettingsPayload,
    responses(
        (status = 200, description = "Configuração salva", body = AppSettings),
        (status = 400, description = "Horário fora do formato HH:MM")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapManageSettings>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Json(payload): Json<UpdateSettingsPayload>,
) -> Result<Json<AppSettings>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let settings = app_state.settings_repo.update(&payload).await?;

    app_state
        .log_repo
        .append_pool(
            admin.id,
            &admin.username,
            "Update Settings",
            &format!(
                "Cutoff {} ({} - {}), retention {} days",
                if settings.cutoff_enabled { "enabled" } else { "disabled" },
                settings.cutoff_start,
                settings.cutoff_end,
                settings.auto_delete_days
            ),
        )
        .await?;

    Ok(Json(settings))
}

// GET /api/admin/backup — snapshot JSON das cinco tabelas
#[utoipa::path(
    get,
    path = "/api/admin/backup",
    tag = "Admin",
    responses(
        (status = 200, description = "Snapshot completo do sistema", body = BackupDocument)
    ),
    security(("api_jwt" = []))
)]
pub async fn download_backup(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapExportBackup>,
    AuthenticatedUser(admin): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_repo.list_all().await?;
    let customer_codes = app_state.code_repo.list_all().await?;
    let instructions = app_state.instruction_repo.list_all_snapshot().await?;
    let logs = app_state.log_repo.list_all().await?;

    // Marca o momento do backup antes de montar o documento
    let settings = app_state.settings_repo.touch_last_backup().await?;

    app_state
        .log_repo
        .append_pool(
            admin.id,
            &admin.username,
            "Backup",
            "Exported full JSON backup",
        )
        .await?;

    let document = BackupDocument {
        generated_at: Utc::now(),
        users,
        customer_codes,
        instructions,
        settings,
        logs,
    };

    let filename = format!(
        "deliveryflow_backup_{}.json",
        Local::now().format("%Y-%m-%d")
    );

    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )],
        Json(document),
    ))
}

// POST /api/admin/cleanup — varredura manual de retenção
#[utoipa::path(
    post,
    path = "/api/admin/cleanup",
    tag = "Admin",
    responses(
        (status = 200, description = "Quantidade de instruções removidas", body = CleanupResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn run_cleanup(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapRunCleanup>,
    AuthenticatedUser(admin): AuthenticatedUser,
) -> Result<Json<CleanupResponse>, AppError> {
    let removed = app_state.instruction_service.cleanup(&admin).await?;
    Ok(Json(CleanupResponse { removed }))
}
