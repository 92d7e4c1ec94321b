// src/services/instruction_service.rs

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, Timelike, Utc};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        ActivityLogRepository, CustomerCodeRepository, InstructionRepository, SettingsRepository,
        instruction_repo::NewInstruction,
    },
    middleware::rbac::{Capability, role_allows},
    models::{
        auth::User,
        instruction::{
            Instruction, InstructionFilters, InstructionStatus, SubmitInstructionsPayload,
            UpdateInstructionPayload,
        },
        settings::AppSettings,
    },
};

// Colunas exportáveis da tela de revisão: (chave, rótulo), na ordem da tela
pub const EXPORT_COLUMNS: [(&str, &str); 12] = [
    ("referenceNumber", "Reference #"),
    ("createdAt", "Submitted Date"),
    ("customerCode", "Customer Code"),
    ("creName", "Submitted By"),
    ("salesOrder", "Sales Order"),
    ("productionOrder", "Prod Order"),
    ("location", "Location"),
    ("assignedTo", "Assigned To"),
    ("status", "Status"),
    ("currentUpdate", "Current Update"),
    ("commentsSales", "Sales Comments"),
    ("commentsCommercial", "Commercial Comments"),
];

#[derive(Clone)]
pub struct InstructionService {
    pool: PgPool,
    instruction_repo: InstructionRepository,
    code_repo: CustomerCodeRepository,
    settings_repo: SettingsRepository,
    log_repo: ActivityLogRepository,
}

impl InstructionService {
    pub fn new(
        pool: PgPool,
        instruction_repo: InstructionRepository,
        code_repo: CustomerCodeRepository,
        settings_repo: SettingsRepository,
        log_repo: ActivityLogRepository,
    ) -> Self {
        Self {
            pool,
            instruction_repo,
            code_repo,
            settings_repo,
            log_repo,
        }
    }

    // Submete um lote inteiro dentro de uma transação: ou todas as linhas
    // entram, ou nenhuma (janela de cutoff e duplicatas recusam o lote todo).
    pub async fn submit(
        &self,
        actor: &User,
        payload: &SubmitInstructionsPayload,
    ) -> Result<Vec<Instruction>, AppError> {
        validate_batch(payload)?;

        let now_local = Local::now();
        let minute_of_day = now_local.time().hour() * 60 + now_local.time().minute();

        let mut tx = self.pool.begin().await?;

        let settings = self.settings_repo.get(&mut *tx).await?;
        if let Some(message) = cutoff_message(&settings, minute_of_day) {
            return Err(AppError::CutoffViolation(message));
        }

        // Duplicata contra o que já está gravado (não só dentro do lote)
        for row in &payload.rows {
            let exists = self
                .instruction_repo
                .order_pair_exists(&mut *tx, &row.sales_order, &row.production_order)
                .await?;
            if exists {
                return Err(AppError::DuplicateOrder(format!(
                    "Duplicate detected on server: SO {} / PO {}",
                    row.sales_order, row.production_order
                )));
            }
        }

        // Roteamento: código conhecido aponta o comercial responsável;
        // código desconhecido vira um mapeamento novo sem responsável.
        let mapping = self
            .code_repo
            .find_by_code(&mut *tx, &payload.customer_code)
            .await?;
        let (assigned_commercial_user_id, auto_created) = match mapping {
            Some(m) => (m.commercial_user_id, false),
            None => {
                self.code_repo
                    .create_auto(&mut *tx, &payload.customer_code)
                    .await?;
                (None, true)
            }
        };

        let ref_date = now_local.date_naive();
        let mut created = Vec::with_capacity(payload.rows.len());
        for row in &payload.rows {
            let seq = self.instruction_repo.next_ref_value(&mut *tx).await?;
            let new = NewInstruction {
                reference_number: format_reference(ref_date, &actor.short_name, seq),
                cre_name: &actor.short_name,
                cre_user_id: actor.id,
                customer_code: &payload.customer_code,
                location: &payload.location,
                sales_order: &row.sales_order,
                production_order: &row.production_order,
                assigned_commercial_user_id,
                comments_sales: &payload.comments_sales,
            };
            created.push(self.instruction_repo.insert(&mut *tx, &new).await?);
        }

        self.log_repo
            .append(
                &mut *tx,
                actor.id,
                &actor.username,
                "Submit Instructions",
                &format!("Submitted {} instructions.", created.len()),
            )
            .await?;

        if auto_created {
            self.log_repo
                .append(
                    &mut *tx,
                    actor.id,
                    &actor.username,
                    "Auto-Create Code",
                    &format!("Created new customer code: {}", payload.customer_code),
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            count = created.len(),
            cre = %actor.short_name,
            "Lote de instruções gravado"
        );

        Ok(created)
    }

    // Listagem com o escopo do perfil + os filtros da tela (todos em E)
    pub async fn list(
        &self,
        actor: &User,
        filters: &InstructionFilters,
        users: &[User],
    ) -> Result<Vec<Instruction>, AppError> {
        let rows = self.instruction_repo.list_visible(actor).await?;
        Ok(apply_filters(rows, filters, users))
    }

    // Edição parcial: cada campo presente exige a capacidade correspondente.
    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        payload: &UpdateInstructionPayload,
    ) -> Result<Instruction, AppError> {
        if payload.is_empty() {
            return Err(AppError::InvalidSubmission(
                "No fields to update.".to_string(),
            ));
        }

        if (payload.status.is_some() || payload.current_update.is_some())
            && !role_allows(actor.role, Capability::UpdateInstructionProgress)
        {
            return Err(AppError::Forbidden("update instruction status"));
        }
        if payload.comments_sales.is_some()
            && !role_allows(actor.role, Capability::EditSalesComments)
        {
            return Err(AppError::Forbidden("edit sales comments"));
        }
        if payload.comments_commercial.is_some()
            && !role_allows(actor.role, Capability::EditCommercialComments)
        {
            return Err(AppError::Forbidden("edit commercial comments"));
        }

        let old = self
            .instruction_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Instruction"))?;

        let new_status = payload.status.unwrap_or(old.status);
        let completed_at = next_completed_at(old.status, old.completed_at, new_status, Utc::now());

        let updated = self
            .instruction_repo
            .apply_update(
                id,
                new_status,
                payload.current_update.as_deref().unwrap_or(&old.current_update),
                payload.comments_sales.as_deref().unwrap_or(&old.comments_sales),
                payload
                    .comments_commercial
                    .as_deref()
                    .unwrap_or(&old.comments_commercial),
                completed_at,
            )
            .await?;

        self.log_repo
            .append_pool(
                actor.id,
                &actor.username,
                "Update Instruction",
                &format!(
                    "Updated {}. Changes: {}",
                    old.reference_number,
                    change_set_json(payload)
                ),
            )
            .await?;

        Ok(updated)
    }

    // Varredura de retenção: remove de vez as concluídas há mais de N dias
    pub async fn cleanup(&self, actor: &User) -> Result<u64, AppError> {
        let settings = self.settings_repo.get_from_pool().await?;
        let threshold = Utc::now() - chrono::Duration::days(i64::from(settings.auto_delete_days));

        let removed = self
            .instruction_repo
            .delete_completed_before(threshold)
            .await?;

        if removed > 0 {
            self.log_repo
                .append_pool(
                    actor.id,
                    &actor.username,
                    "Cleanup",
                    &format!(
                        "Removed {} records older than {} days.",
                        removed, settings.auto_delete_days
                    ),
                )
                .await?;
        }

        Ok(removed)
    }
}

// ---
// Regras puras (testáveis sem banco)
// ---

// "HH:MM" -> minuto do dia
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    if h < 24 && m < 60 { Some(h * 60 + m) } else { None }
}

// Decide se a janela de cutoff bloqueia a submissão neste minuto do dia.
// Janela normal (start <= end): bloqueia dentro de [start, end].
// Janela que vira a meia-noite (end < start): bloqueia fora de [end, start],
// ou seja, de start até 23:59 e de 00:00 até end.
pub fn cutoff_message(settings: &AppSettings, minute_of_day: u32) -> Option<String> {
    if !settings.cutoff_enabled {
        return None;
    }
    let (Some(start), Some(end)) = (
        parse_hhmm(&settings.cutoff_start),
        parse_hhmm(&settings.cutoff_end),
    ) else {
        tracing::warn!(
            start = %settings.cutoff_start,
            end = %settings.cutoff_end,
            "Horário de cutoff malformado; submissão liberada"
        );
        return None;
    };

    let blocked = if start <= end {
        minute_of_day >= start && minute_of_day <= end
    } else {
        minute_of_day >= start || minute_of_day <= end
    };

    blocked.then(|| {
        format!(
            "Submission blocked. Cutoff active between {} and {}.",
            settings.cutoff_start, settings.cutoff_end
        )
    })
}

// Validação do lote, na ordem da tela de submissão
pub fn validate_batch(payload: &SubmitInstructionsPayload) -> Result<(), AppError> {
    if payload.customer_code.trim().is_empty() || payload.location.trim().is_empty() {
        return Err(AppError::InvalidSubmission(
            "Customer Code and Location are required.".to_string(),
        ));
    }
    for row in &payload.rows {
        if row.sales_order.trim().is_empty() {
            return Err(AppError::InvalidSubmission(
                "Sales Order is required for all rows.".to_string(),
            ));
        }
    }

    let mut seen = HashSet::new();
    for row in &payload.rows {
        if !seen.insert((row.sales_order.as_str(), row.production_order.as_str())) {
            return Err(AppError::InvalidSubmission(
                "Duplicate Sales Order + Production Order combinations in current form."
                    .to_string(),
            ));
        }
    }

    Ok(())
}

// Número de referência: data + sigla do CRE + sequência do banco.
// A sequência vem do Postgres, então o número não se repete entre restarts.
pub fn format_reference(date: NaiveDate, short_name: &str, seq: i64) -> String {
    format!("{}{}{:04}", date.format("%Y%m%d"), short_name, seq)
}

// Carimbo de conclusão: marcado ao entrar em Completed, limpo ao sair.
pub fn next_completed_at(
    old_status: InstructionStatus,
    old_completed_at: Option<DateTime<Utc>>,
    new_status: InstructionStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (old_status, new_status) {
        (InstructionStatus::Pending, InstructionStatus::Completed) => Some(now),
        (_, InstructionStatus::Pending) => None,
        _ => old_completed_at,
    }
}

fn change_set_json(payload: &UpdateInstructionPayload) -> String {
    let mut map = serde_json::Map::new();
    if let Some(status) = payload.status {
        map.insert("status".to_string(), json!(status));
    }
    if let Some(update) = &payload.current_update {
        map.insert("currentUpdate".to_string(), json!(update));
    }
    if let Some(comments) = &payload.comments_sales {
        map.insert("commentsSales".to_string(), json!(comments));
    }
    if let Some(comments) = &payload.comments_commercial {
        map.insert("commentsCommercial".to_string(), json!(comments));
    }
    serde_json::Value::Object(map).to_string()
}

// Sigla do comercial responsável, como aparece na tela e no CSV
fn assigned_short_name(instruction: &Instruction, users: &[User]) -> String {
    instruction
        .assigned_commercial_user_id
        .and_then(|id| users.iter().find(|u| u.id == id))
        .map(|u| u.short_name.clone())
        .unwrap_or_else(|| "Unassigned".to_string())
}

fn active_filter(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// Filtros da tela de revisão: campo vazio não restringe; todos combinam com E.
pub fn apply_filters(
    rows: Vec<Instruction>,
    filters: &InstructionFilters,
    users: &[User],
) -> Vec<Instruction> {
    rows.into_iter()
        .filter(|inst| {
            if let Some(so) = active_filter(&filters.sales_order)
                && !inst.sales_order.to_lowercase().contains(&so.to_lowercase())
            {
                return false;
            }
            if let Some(po) = active_filter(&filters.production_order)
                && !inst
                    .production_order
                    .to_lowercase()
                    .contains(&po.to_lowercase())
            {
                return false;
            }
            if let Some(assigned) = active_filter(&filters.assigned_to)
                && assigned_short_name(inst, users) != assigned
            {
                return false;
            }
            if let Some(status) = filters.status
                && inst.status != status
            {
                return false;
            }
            if let Some(update) = active_filter(&filters.current_update)
                && inst.current_update != update
            {
                return false;
            }
            if let Some(submitter) = active_filter(&filters.submitted_by)
                && inst.cre_name != submitter
            {
                return false;
            }
            true
        })
        .collect()
}

// ---
// Export CSV
// ---

// Campo CSV sempre entre aspas, com aspas internas dobradas
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn cell_value(instruction: &Instruction, key: &str, users: &[User]) -> String {
    match key {
        "referenceNumber" => instruction.reference_number.clone(),
        "createdAt" => instruction.created_at.format("%Y-%m-%d").to_string(),
        "customerCode" => instruction.customer_code.clone(),
        "creName" => instruction.cre_name.clone(),
        "salesOrder" => instruction.sales_order.clone(),
        "productionOrder" => instruction.production_order.clone(),
        "location" => instruction.location.clone(),
        "assignedTo" => assigned_short_name(instruction, users),
        "status" => match instruction.status {
            InstructionStatus::Pending => "Pending".to_string(),
            InstructionStatus::Completed => "Completed".to_string(),
        },
        "currentUpdate" => instruction.current_update.clone(),
        "commentsSales" => instruction.comments_sales.clone(),
        "commentsCommercial" => instruction.comments_commercial.clone(),
        _ => String::new(),
    }
}

// Resolve a lista de colunas pedida pelo cliente; chave desconhecida é
// descartada, pedido vazio cai no conjunto completo na ordem da tela.
pub fn resolve_columns(spec: Option<&str>) -> Vec<&'static str> {
    let requested: Vec<&'static str> = spec
        .map(|s| {
            s.split(',')
                .filter_map(|part| {
                    let part = part.trim();
                    EXPORT_COLUMNS
                        .iter()
                        .find(|(key, _)| *key == part)
                        .map(|(key, _)| *key)
                })
                .collect()
        })
        .unwrap_or_default();

    if requested.is_empty() {
        EXPORT_COLUMNS.iter().map(|(key, _)| *key).collect()
    } else {
        requested
    }
}

pub fn render_csv(rows: &[Instruction], users: &[User], columns: &[&str]) -> String {
    fn label_of<'a>(key: &'a str) -> &'a str {
        EXPORT_COLUMNS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, label)| *label)
            .unwrap_or(key)
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|key| csv_field(label_of(key)))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        lines.push(
            columns
                .iter()
                .map(|key| csv_field(&cell_value(row, key, users)))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use chrono::TimeZone;

    fn settings(enabled: bool, start: &str, end: &str) -> AppSettings {
        AppSettings {
            id: 1,
            cutoff_enabled: enabled,
            cutoff_start: start.to_string(),
            cutoff_end: end.to_string(),
            auto_delete_days: 14,
            last_backup: None,
        }
    }

    fn payload(rows: Vec<(&str, &str)>) -> SubmitInstructionsPayload {
        SubmitInstructionsPayload {
            customer_code: "CUST001".to_string(),
            location: "Warehouse A".to_string(),
            comments_sales: String::new(),
            rows: rows
                .into_iter()
                .map(|(so, po)| crate::models::instruction::SubmitRow {
                    sales_order: so.to_string(),
                    production_order: po.to_string(),
                })
                .collect(),
        }
    }

    fn sample_user(role: Role, short: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: short.to_lowercase(),
            full_name: format!("{short} Full"),
            short_name: short.to_string(),
            role,
            password: "secret".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn sample_instruction(so: &str, po: &str) -> Instruction {
        Instruction {
            id: Uuid::new_v4(),
            reference_number: "20250101SL10001".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
            cre_name: "SL1".to_string(),
            cre_user_id: Uuid::new_v4(),
            customer_code: "CUST001".to_string(),
            location: "New York".to_string(),
            sales_order: so.to_string(),
            production_order: po.to_string(),
            assigned_commercial_user_id: None,
            status: InstructionStatus::Pending,
            current_update: String::new(),
            comments_sales: String::new(),
            comments_commercial: String::new(),
            completed_at: None,
            is_deleted: false,
        }
    }

    #[test]
    fn parses_hhmm() {
        assert_eq!(parse_hhmm("10:00"), Some(600));
        assert_eq!(parse_hhmm("00:00"), Some(0));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("10:60"), None);
        assert_eq!(parse_hhmm("1000"), None);
    }

    #[test]
    fn cutoff_disabled_never_blocks() {
        let s = settings(false, "10:00", "15:00");
        assert_eq!(cutoff_message(&s, 720), None);
    }

    #[test]
    fn cutoff_blocks_inside_window() {
        let s = settings(true, "10:00", "15:00");
        assert!(cutoff_message(&s, 600).is_some()); // 10:00, borda inclusa
        assert!(cutoff_message(&s, 720).is_some()); // 12:00
        assert!(cutoff_message(&s, 900).is_some()); // 15:00, borda inclusa
        assert_eq!(cutoff_message(&s, 599), None); // 09:59
        assert_eq!(cutoff_message(&s, 901), None); // 15:01
    }

    #[test]
    fn cutoff_wrapping_window_blocks_outside_end_start() {
        // 22:00 -> 02:00: bloqueia de madrugada, libera durante o dia
        let s = settings(true, "22:00", "02:00");
        assert!(cutoff_message(&s, 1380).is_some()); // 23:00
        assert!(cutoff_message(&s, 60).is_some()); // 01:00
        assert!(cutoff_message(&s, 1320).is_some()); // 22:00
        assert!(cutoff_message(&s, 120).is_some()); // 02:00
        assert_eq!(cutoff_message(&s, 720), None); // 12:00
        assert_eq!(cutoff_message(&s, 180), None); // 03:00
    }

    #[test]
    fn cutoff_message_names_the_window() {
        let s = settings(true, "10:00", "15:00");
        let msg = cutoff_message(&s, 720).unwrap();
        assert_eq!(
            msg,
            "Submission blocked. Cutoff active between 10:00 and 15:00."
        );
    }

    #[test]
    fn malformed_cutoff_times_do_not_block() {
        let s = settings(true, "banana", "15:00");
        assert_eq!(cutoff_message(&s, 720), None);
    }

    #[test]
    fn batch_requires_code_and_location() {
        let mut p = payload(vec![("SO-1", "PO-1")]);
        p.customer_code = String::new();
        let err = validate_batch(&p).unwrap_err();
        assert!(matches!(err, AppError::InvalidSubmission(msg)
            if msg == "Customer Code and Location are required."));
    }

    #[test]
    fn batch_requires_sales_order_on_every_row() {
        let p = payload(vec![("SO-1", "PO-1"), ("", "PO-2")]);
        let err = validate_batch(&p).unwrap_err();
        assert!(matches!(err, AppError::InvalidSubmission(msg)
            if msg == "Sales Order is required for all rows."));
    }

    #[test]
    fn batch_rejects_internal_duplicates() {
        let p = payload(vec![("SO-1", "PO-1"), ("SO-1", "PO-1")]);
        assert!(validate_batch(&p).is_err());
    }

    #[test]
    fn batch_allows_same_sales_order_with_different_production_order() {
        let p = payload(vec![("SO-1", "PO-1"), ("SO-1", "PO-2")]);
        assert!(validate_batch(&p).is_ok());
    }

    #[test]
    fn reference_combines_date_cre_and_sequence() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_reference(date, "SL1", 101), "20250307SL10101");
        assert_eq!(format_reference(date, "ADM", 7), "20250307ADM0007");
    }

    #[test]
    fn completing_sets_timestamp() {
        let now = Utc::now();
        let result = next_completed_at(
            InstructionStatus::Pending,
            None,
            InstructionStatus::Completed,
            now,
        );
        assert_eq!(result, Some(now));
    }

    #[test]
    fn reverting_clears_timestamp() {
        let then = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let result = next_completed_at(
            InstructionStatus::Completed,
            Some(then),
            InstructionStatus::Pending,
            Utc::now(),
        );
        assert_eq!(result, None);
    }

    #[test]
    fn staying_completed_keeps_original_timestamp() {
        let then = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let now = Utc::now();
        let result = next_completed_at(
            InstructionStatus::Completed,
            Some(then),
            InstructionStatus::Completed,
            now,
        );
        assert_eq!(result, Some(then));
    }

    #[test]
    fn change_set_lists_only_provided_fields() {
        let p = UpdateInstructionPayload {
            status: Some(InstructionStatus::Completed),
            current_update: Some("Approved".to_string()),
            comments_sales: None,
            comments_commercial: None,
        };
        let json: serde_json::Value = serde_json::from_str(&change_set_json(&p)).unwrap();
        assert_eq!(json["status"], "Completed");
        assert_eq!(json["currentUpdate"], "Approved");
        assert!(json.get("commentsSales").is_none());
    }

    #[test]
    fn filters_combine_with_and() {
        let mut a = sample_instruction("SO-9001", "PO-8001");
        a.current_update = "Delayed".to_string();
        let b = sample_instruction("SO-9002", "PO-8002");

        let filters = InstructionFilters {
            sales_order: Some("so-900".to_string()),
            current_update: Some("Delayed".to_string()),
            ..Default::default()
        };
        let result = apply_filters(vec![a.clone(), b], &filters, &[]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sales_order, "SO-9001");
    }

    #[test]
    fn empty_filter_values_do_not_restrict() {
        let rows = vec![
            sample_instruction("SO-1", "PO-1"),
            sample_instruction("SO-2", "PO-2"),
        ];
        let filters = InstructionFilters {
            sales_order: Some(String::new()),
            submitted_by: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(apply_filters(rows, &filters, &[]).len(), 2);
    }

    #[test]
    fn unassigned_filter_matches_rows_without_commercial() {
        let commercial = sample_user(Role::Commercial, "CM1");
        let mut assigned = sample_instruction("SO-1", "PO-1");
        assigned.assigned_commercial_user_id = Some(commercial.id);
        let unassigned = sample_instruction("SO-2", "PO-2");

        let filters = InstructionFilters {
            assigned_to: Some("Unassigned".to_string()),
            ..Default::default()
        };
        let result = apply_filters(
            vec![assigned, unassigned],
            &filters,
            std::slice::from_ref(&commercial),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sales_order, "SO-2");
    }

    #[test]
    fn csv_escapes_embedded_quotes() {
        assert_eq!(csv_field(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(csv_field("plain"), "\"plain\"");
    }

    #[test]
    fn csv_respects_requested_column_order() {
        let mut inst = sample_instruction("SO-9001", "PO-8001");
        inst.comments_sales = "urgent, \"fragile\"".to_string();
        let csv = render_csv(&[inst], &[], &["salesOrder", "commentsSales"]);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "\"Sales Order\",\"Sales Comments\"");
        assert_eq!(
            lines.next().unwrap(),
            "\"SO-9001\",\"urgent, \"\"fragile\"\"\""
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn unknown_columns_fall_back_to_full_set() {
        assert_eq!(resolve_columns(None).len(), EXPORT_COLUMNS.len());
        assert_eq!(resolve_columns(Some("bogus")).len(), EXPORT_COLUMNS.len());
        assert_eq!(
            resolve_columns(Some("status,salesOrder")),
            vec!["status", "salesOrder"]
        );
    }

    #[test]
    fn csv_round_trips_the_visible_rows() {
        // Reparsing simples (campos sempre entre aspas) recupera o que foi exportado
        let rows = vec![
            sample_instruction("SO-1", "PO-1"),
            sample_instruction("SO-2", "PO-2"),
        ];
        let csv = render_csv(&rows, &[], &["salesOrder", "productionOrder"]);
        let parsed: Vec<Vec<String>> = csv
            .lines()
            .skip(1)
            .map(|line| {
                line.trim_matches('"')
                    .split("\",\"")
                    .map(|f| f.replace("\"\"", "\""))
                    .collect()
            })
            .collect();
        assert_eq!(
            parsed,
            vec![
                vec!["SO-1".to_string(), "PO-1".to_string()],
                vec!["SO-2".to_string(), "PO-2".to_string()],
            ]
        );
    }
}
