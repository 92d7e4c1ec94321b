// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Diretório completo, usado nas telas para resolver nomes
    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    // Cria um novo usuário, com tratamento do username duplicado
    pub async fn create(
        &self,
        username: &str,
        full_name: &str,
        short_name: &str,
        role: Role,
        password: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, full_name, short_name, role, password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(full_name)
        .bind(short_name)
        .bind(role)
        .bind(password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error()
                && db_err.is_unique_violation()
            {
                return AppError::UsernameAlreadyExists;
            }
            AppError::DatabaseError(e)
        })
    }

    // Edição vinda da aba de usuários; senha None mantém a atual
    pub async fn update(
        &self,
        id: Uuid,
        username: &str,
        full_name: &str,
        role: Role,
        password: Option<&str>,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2,
                full_name = $3,
                role = $4,
                password = COALESCE($5, password)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(full_name)
        .bind(role)
        .bind(password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("User"),
            other => {
                if let Some(db_err) = other.as_database_error()
                    && db_err.is_unique_violation()
                {
                    return AppError::UsernameAlreadyExists;
                }
                AppError::DatabaseError(other)
            }
        })
    }

    // Habilita/desabilita (o botão "Power" da tela de usuários)
    pub async fn toggle_active(&self, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET is_active = NOT is_active WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("User"),
            other => AppError::DatabaseError(other),
        })
    }

    pub async fn update_password(&self, id: Uuid, new_password: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password = $2 WHERE id = $1")
            .bind(id)
            .bind(new_password)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User"));
        }
        Ok(())
    }
}
