// src/db/settings_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::settings::{AppSettings, UpdateSettingsPayload},
};

// A linha única de configuração (id = 1, garantido pela migration)
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get<'e, E>(&self, executor: E) -> Result<AppSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let settings =
            sqlx::query_as::<_, AppSettings>("SELECT * FROM app_settings WHERE id = 1")
                .fetch_one(executor)
                .await?;
        Ok(settings)
    }

    pub async fn get_from_pool(&self) -> Result<AppSettings, AppError> {
        self.get(&self.pool).await
    }

    pub async fn update(&self, input: &UpdateSettingsPayload) -> Result<AppSettings, AppError> {
        let settings = sqlx::query_as::<_, AppSettings>(
            r#"
            UPDATE app_settings
            SET cutoff_enabled = $1,
                cutoff_start = $2,
                cutoff_end = $3,
                auto_delete_days = $4
            WHERE id = 1
            RETURNING *
            "#,
        )
        .bind(input.cutoff_enabled)
        .bind(&input.cutoff_start)
        .bind(&input.cutoff_end)
        .bind(input.auto_delete_days)
        .fetch_one(&self.pool)
        .await?;
        Ok(settings)
    }

    // Registra o momento do último backup exportado
    pub async fn touch_last_backup(&self) -> Result<AppSettings, AppError> {
        let settings = sqlx::query_as::<_, AppSettings>(
            "UPDATE app_settings SET last_backup = NOW() WHERE id = 1 RETURNING *",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(settings)
    }
}
