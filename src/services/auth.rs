// src/services/auth.rs

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ActivityLogRepository, UserRepository},
    models::auth::{Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    log_repo: ActivityLogRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        log_repo: ActivityLogRepository,
        jwt_secret: String,
    ) -> Self {
        Self {
            user_repo,
            log_repo,
            jwt_secret,
        }
    }

    // Login por comparação literal com o valor armazenado (case-sensitive,
    // sem hashing — requisito herdado do sistema original). Usuário inativo
    // nunca autentica, mesmo com a senha certa.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active || user.password != password {
            return Err(AppError::InvalidCredentials);
        }

        self.log_repo
            .append_pool(user.id, &user.username, "Login", "User logged in")
            .await?;

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    // O token continua válido até expirar no cliente; o logout existe
    // para deixar o evento registrado na trilha de auditoria.
    pub async fn logout(&self, user: &User) -> Result<(), AppError> {
        self.log_repo
            .append_pool(user.id, &user.username, "Logout", "User logged out")
            .await
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        // Conta desativada derruba o acesso na requisição seguinte
        if !user.is_active {
            return Err(AppError::InvalidToken);
        }

        Ok(user)
    }

    // Troca de senha do próprio usuário: exige a senha atual correta
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if user.password != current_password {
            return Err(AppError::InvalidCredentials);
        }

        self.user_repo.update_password(user.id, new_password).await?;

        self.log_repo
            .append_pool(
                user.id,
                &user.username,
                "Change Password",
                "User changed their own password",
            )
            .await
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
