// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{
    activity_log::ActivityLog, auth::User, customer_code::CustomerCode, instruction::Instruction,
};

// Configuração global do sistema (linha única no banco)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(skip_serializing)]
    #[schema(ignore)] // O id é fixo em 1; não interessa ao cliente
    pub id: i32,

    pub cutoff_enabled: bool,

    #[schema(example = "10:00")]
    pub cutoff_start: String,

    #[schema(example = "15:00")]
    pub cutoff_end: String,

    pub auto_delete_days: i32,
    pub last_backup: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    pub cutoff_enabled: bool,

    #[validate(custom(function = "validate_hhmm"))]
    #[schema(example = "10:00")]
    pub cutoff_start: String,

    #[validate(custom(function = "validate_hhmm"))]
    #[schema(example = "15:00")]
    pub cutoff_end: String,

    #[validate(range(min = 1, max = 3650, message = "Retention must be between 1 and 3650 days."))]
    pub auto_delete_days: i32,
}

// Valida o formato "HH:MM" (24h)
fn validate_hhmm(value: &str) -> Result<(), ValidationError> {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() == 2
        && parts[0].len() == 2
        && parts[1].len() == 2
        && let (Ok(h), Ok(m)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>())
        && h < 24
        && m < 60
    {
        return Ok(());
    }
    let mut err = ValidationError::new("time");
    err.message = Some("Expected HH:MM (24h).".into());
    Err(err)
}

// Snapshot completo do estado do sistema, exportado pela aba Data
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub generated_at: DateTime<Utc>,
    pub users: Vec<User>,
    pub customer_codes: Vec<CustomerCode>,
    pub instructions: Vec<Instruction>,
    pub settings: AppSettings,
    pub logs: Vec<ActivityLog>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub removed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_times() {
        assert!(validate_hhmm("00:00").is_ok());
        assert!(validate_hhmm("10:30").is_ok());
        assert!(validate_hhmm("23:59").is_ok());
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(validate_hhmm("24:00").is_err());
        assert!(validate_hhmm("10:60").is_err());
        assert!(validate_hhmm("9:00").is_err());
        assert!(validate_hhmm("1000").is_err());
        assert!(validate_hhmm("aa:bb").is_err());
    }
}
