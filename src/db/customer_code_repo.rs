// src/db/customer_code_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::customer_code::CustomerCode};

#[derive(Clone)]
pub struct CustomerCodeRepository {
    pool: PgPool,
}

impl CustomerCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<CustomerCode>, AppError> {
        let codes = sqlx::query_as::<_, CustomerCode>(
            "SELECT * FROM customer_codes ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(codes)
    }

    // Resolve o roteamento de um lote; aceita executor para rodar dentro da transação
    pub async fn find_by_code<'e, E>(
        &self,
        executor: E,
        code: &str,
    ) -> Result<Option<CustomerCode>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mapping =
            sqlx::query_as::<_, CustomerCode>("SELECT * FROM customer_codes WHERE code = $1")
                .bind(code)
                .fetch_optional(executor)
                .await?;
        Ok(mapping)
    }

    pub async fn create(
        &self,
        code: &str,
        description: &str,
        commercial_user_id: Option<Uuid>,
    ) -> Result<CustomerCode, AppError> {
        sqlx::query_as::<_, CustomerCode>(
            r#"
            INSERT INTO customer_codes (code, description, commercial_user_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(description)
        .bind(commercial_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.is_unique_violation()
            {
                return AppError::CustomerCodeAlreadyExists;
            }
            AppError::DatabaseError(e)
        })
    }

    // Código desconhecido em uma submissão vira um mapeamento sem responsável
    pub async fn create_auto<'e, E>(
        &self,
        executor: E,
        code: &str,
    ) -> Result<CustomerCode, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mapping = sqlx::query_as::<_, CustomerCode>(
            r#"
            INSERT INTO customer_codes (code, description, commercial_user_id)
            VALUES ($1, 'Auto-created', NULL)
            RETURNING *
            "#,
        )
        .bind(code)
        .fetch_one(executor)
        .await?;
        Ok(mapping)
    }

    pub async fn update(
        &self,
        id: Uuid,
        description: &str,
        commercial_user_id: Option<Uuid>,
    ) -> Result<CustomerCode, AppError> {
        sqlx::query_as::<_, CustomerCode>(
            r#"
            UPDATE customer_codes
            SET description = $2, commercial_user_id = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(description)
        .bind(commercial_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Mapping"),
            other => AppError::DatabaseError(other),
        })
    }

    // Remove e devolve a linha, para registrar o código no log
    pub async fn delete(&self, id: Uuid) -> Result<CustomerCode, AppError> {
        sqlx::query_as::<_, CustomerCode>(
            "DELETE FROM customer_codes WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Mapping"),
            other => AppError::DatabaseError(other),
        })
    }
}
