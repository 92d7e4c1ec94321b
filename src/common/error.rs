use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As mensagens voltadas ao usuário ficam em inglês (idioma da aplicação).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Submissão malformada (campos obrigatórios, duplicata dentro do lote)
    #[error("{0}")]
    InvalidSubmission(String),

    // Janela de cutoff ativa: o lote inteiro é recusado
    #[error("{0}")]
    CutoffViolation(String),

    // Par (sales order, production order) já existe no banco
    #[error("{0}")]
    DuplicateOrder(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Sem permissão: {0}")]
    Forbidden(&'static str),

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Username já existe")]
    UsernameAlreadyExists,

    #[error("Código de cliente já existe")]
    CustomerCodeAlreadyExists,

    // Admin tentando alterar o próprio perfil de acesso
    #[error("Não é permitido alterar o próprio perfil")]
    SelfRoleChange,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidSubmission(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::CutoffViolation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::DuplicateOrder(msg) => (StatusCode::CONFLICT, msg),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid authentication token.".to_string(),
            ),
            AppError::Forbidden(action) => (
                StatusCode::FORBIDDEN,
                format!("You are not allowed to {}.", action),
            ),
            AppError::NotFound(entity) => {
                (StatusCode::NOT_FOUND, format!("{} not found.", entity))
            }
            AppError::UsernameAlreadyExists => (
                StatusCode::CONFLICT,
                "This username is already in use.".to_string(),
            ),
            AppError::CustomerCodeAlreadyExists => (
                StatusCode::CONFLICT,
                "This customer code is already mapped.".to_string(),
            ),
            AppError::SelfRoleChange => (
                StatusCode::BAD_REQUEST,
                "You cannot change your own role.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
