// src/handlers/instructions.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Local;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CapSubmitInstructions, RequireCapability},
    },
    models::instruction::{
        ExportColumns, Instruction, InstructionFilters, InstructionListResponse,
        SubmitInstructionsPayload, SubmitResponse, UpdateInstructionPayload,
    },
    services::instruction_service::{render_csv, resolve_columns},
};

// GET /api/instructions
#[utoipa::path(
    get,
    path = "/api/instructions",
    tag = "Instructions",
    params(InstructionFilters),
    responses(
        (status = 200, description = "Instruções visíveis ao perfil, já filtradas", body = InstructionListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_instructions(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filters): Query<InstructionFilters>,
) -> Result<Json<InstructionListResponse>, AppError> {
    // O diretório de usuários acompanha a resposta para o lookup de nomes
    let users = app_state.user_repo.list_all().await?;
    let instructions = app_state
        .instruction_service
        .list(&user, &filters, &users)
        .await?;

    Ok(Json(InstructionListResponse {
        instructions,
        users,
    }))
}

// POST /api/instructions — o lote inteiro entra ou nada entra
#[utoipa::path(
    post,
    path = "/api/instructions",
    tag = "Instructions",
    request_body = SubmitInstructionsPayload,
    responses(
        (status = 201, description = "Lote gravado", body = SubmitResponse),
        (status = 400, description = "Lote malformado"),
        (status = 409, description = "Par sales/production order já existente"),
        (status = 422, description = "Janela de cutoff ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_instructions(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapSubmitInstructions>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SubmitInstructionsPayload>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let instructions = app_state.instruction_service.submit(&user, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            submitted: instructions.len(),
            instructions,
        }),
    ))
}

// PATCH /api/instructions/{id}
#[utoipa::path(
    patch,
    path = "/api/instructions/{id}",
    tag = "Instructions",
    request_body = UpdateInstructionPayload,
    responses(
        (status = 200, description = "Instrução atualizada", body = Instruction),
        (status = 403, description = "Campo não permitido para o perfil"),
        (status = 404, description = "Instrução não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da instrução")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_instruction(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInstructionPayload>,
) -> Result<Json<Instruction>, AppError> {
    let updated = app_state
        .instruction_service
        .update(&user, id, &payload)
        .await?;
    Ok(Json(updated))
}

// GET /api/instructions/export — CSV das linhas filtradas/colunas visíveis
#[utoipa::path(
    get,
    path = "/api/instructions/export",
    tag = "Instructions",
    params(InstructionFilters, ExportColumns),
    responses(
        (status = 200, description = "CSV com as linhas filtradas", body = String, content_type = "text/csv")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_instructions(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filters): Query<InstructionFilters>,
    Query(export): Query<ExportColumns>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_repo.list_all().await?;
    let rows = app_state
        .instruction_service
        .list(&user, &filters, &users)
        .await?;

    let columns = resolve_columns(export.columns.as_deref());
    let csv = render_csv(&rows, &users, &columns);

    let filename = format!(
        "instructions_export_{}.csv",
        Local::now().format("%Y-%m-%d")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    ))
}
