// src/models/activity_log.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Uma linha da trilha de auditoria. Append-only: nunca é alterada nem apagada.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub action: String,

    // Texto livre; nas edições de instrução é um change-set em JSON
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogFilters {
    pub action: Option<String>,
    pub user: Option<String>,
}
