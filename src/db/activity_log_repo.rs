// src/db/activity_log_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::activity_log::ActivityLog};

// Trilha de auditoria. Só existem duas operações: acrescentar e ler.
#[derive(Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Acrescenta uma entrada; aceita executor para participar da transação da mutação
    pub async fn append<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        user_name: &str,
        action: &str,
        details: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (user_id, user_name, action, details)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(user_name)
        .bind(action)
        .bind(details)
        .execute(executor)
        .await?;
        Ok(())
    }

    // Versão de conveniência fora de transações
    pub async fn append_pool(
        &self,
        user_id: Uuid,
        user_name: &str,
        action: &str,
        details: &str,
    ) -> Result<(), AppError> {
        self.append(&self.pool, user_id, user_name, action, details)
            .await
    }

    // Mais recentes primeiro
    pub async fn list_all(&self) -> Result<Vec<ActivityLog>, AppError> {
        let logs = sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_logs ORDER BY timestamp DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }
}
