// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::instruction::Instruction;

// 1. Os cards do topo (contagens sobre o conjunto visível ao usuário)
#[derive(Debug, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiCounts {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
}

// 2. Um dia do gráfico de tendência (últimos 7 dias corridos)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: String, // YYYY-MM-DD
    pub count: i64,
}

// 3. Submissões por usuário de vendas (oculto para o perfil Sales)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStat {
    pub name: String,
    pub count: i64,
}

// Resposta completa do dashboard
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(flatten)]
    pub counts: KpiCounts,
    pub trend: Vec<TrendPoint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_stats: Option<Vec<UserStat>>,

    pub recent: Vec<Instruction>,
}
