// src/handlers/ai.rs
//
// Endpoints best-effort do assistente de texto. Nunca devolvem erro:
// em qualquer falha o serviço entrega um texto de fallback.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::instruction::InstructionFilters,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PolishPayload {
    #[schema(example = "so-9001 waiting appr, check pallet 7")]
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AiTextResponse {
    pub text: String,
}

// POST /api/ai/summary — resumo das pendências visíveis ao chamador
#[utoipa::path(
    post,
    path = "/api/ai/summary",
    tag = "AI",
    responses(
        (status = 200, description = "Resumo em prosa (ou fallback estático)", body = AiTextResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn summary(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<AiTextResponse>, AppError> {
    let users = app_state.user_repo.list_all().await?;
    let instructions = app_state
        .instruction_service
        .list(&user, &InstructionFilters::default(), &users)
        .await?;

    let text = app_state.ai_client.dashboard_summary(&instructions).await;
    Ok(Json(AiTextResponse { text }))
}

// POST /api/ai/polish — reescreve um comentário para ficar mais claro
#[utoipa::path(
    post,
    path = "/api/ai/polish",
    tag = "AI",
    request_body = PolishPayload,
    responses(
        (status = 200, description = "Texto revisado (ou o original, em falha)", body = AiTextResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn polish(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Json(payload): Json<PolishPayload>,
) -> Json<AiTextResponse> {
    let text = app_state.ai_client.polish_comment(&payload.text).await;
    Json(AiTextResponse { text })
}
