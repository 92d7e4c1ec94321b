// src/models/instruction.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::User;

// Situação de uma instrução dentro do fluxo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "instruction_status")]
pub enum InstructionStatus {
    Pending,
    Completed,
}

// Lista fixa de atualizações rápidas oferecida na revisão
pub const QUICK_UPDATES: [&str; 9] = [
    "Not ready to invoice",
    "Approval pending",
    "Mismatch",
    "FG Transit",
    "Delayed",
    "Under review",
    "Separate Pending",
    "QA Data Error",
    "Approved",
];

// Uma instrução de entrega vinda do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub id: Uuid,
    pub reference_number: String,
    pub created_at: DateTime<Utc>,
    pub cre_name: String,
    pub cre_user_id: Uuid,
    pub customer_code: String,
    pub location: String,
    pub sales_order: String,
    pub production_order: String,
    pub assigned_commercial_user_id: Option<Uuid>,
    pub status: InstructionStatus,
    pub current_update: String,
    pub comments_sales: String,
    pub comments_commercial: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

// Uma linha do formulário de submissão
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRow {
    #[schema(example = "SO-9001")]
    pub sales_order: String,

    #[serde(default)]
    #[schema(example = "PO-8001")]
    pub production_order: String,
}

// Lote de submissão: os campos compartilhados + as linhas
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInstructionsPayload {
    #[schema(example = "CUST001")]
    pub customer_code: String,

    #[schema(example = "Warehouse A")]
    pub location: String,

    // Comentário opcional aplicado a todas as linhas do lote
    #[serde(default)]
    pub comments_sales: String,

    #[validate(length(min = 1, message = "At least one instruction row is required."))]
    pub rows: Vec<SubmitRow>,
}

// Atualização parcial de uma instrução.
// Só os campos presentes são alterados; cada um tem sua própria permissão.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstructionPayload {
    pub status: Option<InstructionStatus>,
    pub current_update: Option<String>,
    pub comments_sales: Option<String>,
    pub comments_commercial: Option<String>,
}

impl UpdateInstructionPayload {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.current_update.is_none()
            && self.comments_sales.is_none()
            && self.comments_commercial.is_none()
    }
}

// Filtros da tela de revisão. Campo vazio = sem restrição; todos combinam com E.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstructionFilters {
    pub sales_order: Option<String>,
    pub production_order: Option<String>,

    // Sigla do comercial responsável; "Unassigned" casa com não atribuídas
    pub assigned_to: Option<String>,
    pub status: Option<InstructionStatus>,
    pub current_update: Option<String>,
    pub submitted_by: Option<String>,
}

// Parâmetro extra do export CSV (os filtros vêm em separado):
// lista separada por vírgula das chaves de coluna, na ordem da tela
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportColumns {
    pub columns: Option<String>,
}

// Resposta da listagem: instruções visíveis + diretório de usuários para lookup de nomes
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstructionListResponse {
    pub instructions: Vec<Instruction>,
    pub users: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub submitted: usize,
    pub instructions: Vec<Instruction>,
}
