// src/handlers/users.rs
//
// Aba "Users" das configurações (somente Admin).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CapManageUsers, RequireCapability},
    },
    models::auth::{Role, User},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "Username is required."))]
    #[schema(example = "jdoe")]
    pub username: String,

    #[serde(default)]
    #[schema(example = "John Doe")]
    pub full_name: String,

    #[validate(length(min = 3, max = 8, message = "Short name must have 3 to 8 characters."))]
    #[schema(example = "JDoe")]
    pub short_name: String,

    pub role: Role,

    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,

    #[serde(default)]
    pub full_name: String,

    pub role: Role,

    // Vazio/ausente mantém a senha atual
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub new_password: Option<String>,
}

// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "Todas as contas do sistema", body = Vec<User>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapManageUsers>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.user_repo.list_all().await?;
    Ok(Json(users))
}

// POST /api/admin/users
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Admin",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "Username já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapManageUsers>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Json(payload): Json<CreateUserPayload>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // Nome completo vazio cai no username, como na tela original
    let full_name = if payload.full_name.trim().is_empty() {
        payload.username.clone()
    } else {
        payload.full_name.clone()
    };

    let user = app_state
        .user_repo
        .create(
            &payload.username,
            &full_name,
            &payload.short_name,
            payload.role,
            &payload.password,
        )
        .await?;

    app_state
        .log_repo
        .append_pool(
            admin.id,
            &admin.username,
            "Add User",
            &format!("Added user {} ({:?})", user.username, user.role),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// PUT /api/admin/users/{id}
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 400, description = "Tentativa de alterar o próprio perfil de acesso"),
        (status = 404, description = "Usuário não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapManageUsers>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateUserPayload>,
) -> Result<Json<User>, AppError> {
    // Campo de senha em branco no formulário significa "manter a atual"
    if payload.new_password.as_deref() == Some("") {
        payload.new_password = None;
    }
    payload.validate().map_err(AppError::ValidationError)?;

    // Um admin não pode rebaixar a si mesmo
    if id == admin.id && payload.role != admin.role {
        return Err(AppError::SelfRoleChange);
    }

    let password_reset = payload.new_password.is_some();
    let user = app_state
        .user_repo
        .update(
            id,
            &payload.username,
            &payload.full_name,
            payload.role,
            payload.new_password.as_deref(),
        )
        .await?;

    let mut details = format!("Updated details for {}", user.username);
    if password_reset {
        details.push_str(" (Password Reset)");
    }
    app_state
        .log_repo
        .append_pool(admin.id, &admin.username, "Update User", &details)
        .await?;

    Ok(Json(user))
}

// PUT /api/admin/users/{id}/status — o botão habilita/desabilita
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/status",
    tag = "Admin",
    responses(
        (status = 200, description = "Status invertido", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_user_status(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapManageUsers>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = app_state.user_repo.toggle_active(id).await?;

    let status = if user.is_active { "Active" } else { "Inactive" };
    app_state
        .log_repo
        .append_pool(
            admin.id,
            &admin.username,
            "Update User",
            &format!("Set status {} for {}", status, user.username),
        )
        .await?;

    Ok(Json(user))
}

// DELETE /api/admin/users/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 404, description = "Usuário não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapManageUsers>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.user_repo.delete(id).await?;

    app_state
        .log_repo
        .append_pool(
            admin.id,
            &admin.username,
            "Delete User",
            &format!("Deleted user ID {}", id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
