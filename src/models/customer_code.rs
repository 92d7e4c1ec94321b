// src/models/customer_code.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// Mapeamento código de cliente -> usuário comercial responsável
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCode {
    pub id: Uuid,
    pub code: String,
    pub description: String,
    pub commercial_user_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMappingPayload {
    #[validate(length(min = 1, message = "Customer code is required."))]
    #[schema(example = "CUST005")]
    pub code: String,

    #[serde(default)]
    #[schema(example = "Company Name")]
    pub description: String,

    // None = mapeamento criado sem responsável
    pub commercial_user_id: Option<Uuid>,
}

// A edição sempre reenvia os dois campos; responsável None desatribui
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMappingPayload {
    #[serde(default)]
    pub description: String,
    pub commercial_user_id: Option<Uuid>,
}

// Filtros da aba de mapeamentos
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappingFilters {
    // Trecho do código do cliente (case-insensitive)
    pub code: Option<String>,

    // Username exato do comercial responsável
    pub assigned_to: Option<String>,
}
