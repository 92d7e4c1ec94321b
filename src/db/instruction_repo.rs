// src/db/instruction_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{Role, User},
        instruction::{Instruction, InstructionStatus},
    },
};

// Campos de uma inserção, todos resolvidos pelo serviço antes de chegar aqui
pub struct NewInstruction<'a> {
    pub reference_number: String,
    pub cre_name: &'a str,
    pub cre_user_id: Uuid,
    pub customer_code: &'a str,
    pub location: &'a str,
    pub sales_order: &'a str,
    pub production_order: &'a str,
    pub assigned_commercial_user_id: Option<Uuid>,
    pub comments_sales: &'a str,
}

#[derive(Clone)]
pub struct InstructionRepository {
    pool: PgPool,
}

impl InstructionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listagem com o escopo de visibilidade do perfil:
    // Admin vê tudo, Sales vê o que criou, Commercial vê o que lhe foi atribuído.
    pub async fn list_visible(&self, user: &User) -> Result<Vec<Instruction>, AppError> {
        let rows = match user.role {
            Role::Admin => {
                sqlx::query_as::<_, Instruction>(
                    "SELECT * FROM instructions WHERE is_deleted = FALSE ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            Role::Sales => {
                sqlx::query_as::<_, Instruction>(
                    r#"
                    SELECT * FROM instructions
                    WHERE is_deleted = FALSE AND cre_user_id = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(user.id)
                .fetch_all(&self.pool)
                .await?
            }
            Role::Commercial => {
                sqlx::query_as::<_, Instruction>(
                    r#"
                    SELECT * FROM instructions
                    WHERE is_deleted = FALSE AND assigned_commercial_user_id = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(user.id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Instruction>, AppError> {
        let row = sqlx::query_as::<_, Instruction>("SELECT * FROM instructions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    // Usado na checagem de duplicata contra o que já está gravado
    pub async fn order_pair_exists<'e, E>(
        &self,
        executor: E,
        sales_order: &str,
        production_order: &str,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM instructions
                WHERE is_deleted = FALSE AND sales_order = $1 AND production_order = $2
            )
            "#,
        )
        .bind(sales_order)
        .bind(production_order)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    // Próximo valor da sequência de referência
    pub async fn next_ref_value<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let value: i64 = sqlx::query_scalar("SELECT nextval('instruction_ref_seq')")
            .fetch_one(executor)
            .await?;
        Ok(value)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        new: &NewInstruction<'_>,
    ) -> Result<Instruction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Instruction>(
            r#"
            INSERT INTO instructions (
                reference_number, cre_name, cre_user_id, customer_code, location,
                sales_order, production_order, assigned_commercial_user_id, comments_sales
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&new.reference_number)
        .bind(new.cre_name)
        .bind(new.cre_user_id)
        .bind(new.customer_code)
        .bind(new.location)
        .bind(new.sales_order)
        .bind(new.production_order)
        .bind(new.assigned_commercial_user_id)
        .bind(new.comments_sales)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    // Grava o resultado de uma edição: o serviço já decidiu o valor final
    // de cada campo (inclusive completed_at), então a escrita é total.
    pub async fn apply_update(
        &self,
        id: Uuid,
        status: InstructionStatus,
        current_update: &str,
        comments_sales: &str,
        comments_commercial: &str,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Instruction, AppError> {
        sqlx::query_as::<_, Instruction>(
            r#"
            UPDATE instructions
            SET status = $2,
                current_update = $3,
                comments_sales = $4,
                comments_commercial = $5,
                completed_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(current_update)
        .bind(comments_sales)
        .bind(comments_commercial)
        .bind(completed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Instruction"),
            other => AppError::DatabaseError(other),
        })
    }

    // Varredura de retenção: apaga de vez as concluídas antigas.
    // A trilha de auditoria nunca é tocada por aqui.
    pub async fn delete_completed_before(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM instructions
            WHERE status = 'Completed' AND completed_at IS NOT NULL AND completed_at < $1
            "#,
        )
        .bind(threshold)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // Snapshot integral (inclui soft-deleted) para o backup
    pub async fn list_all_snapshot(&self) -> Result<Vec<Instruction>, AppError> {
        let rows =
            sqlx::query_as::<_, Instruction>("SELECT * FROM instructions ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }
}
