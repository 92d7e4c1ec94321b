// src/handlers/mappings.rs
//
// Aba "Mappings": código de cliente -> comercial responsável (somente Admin).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CapManageMappings, RequireCapability},
    },
    models::{
        auth::User,
        customer_code::{CreateMappingPayload, CustomerCode, MappingFilters, UpdateMappingPayload},
    },
};

// Filtro da listagem: trecho do código + username do responsável
fn filter_mappings(
    mappings: Vec<CustomerCode>,
    filters: &MappingFilters,
    users: &[User],
) -> Vec<CustomerCode> {
    mappings
        .into_iter()
        .filter(|m| {
            if let Some(code) = filters.code.as_deref().filter(|c| !c.is_empty())
                && !m.code.to_lowercase().contains(&code.to_lowercase())
            {
                return false;
            }
            if let Some(assigned) = filters.assigned_to.as_deref().filter(|a| !a.is_empty()) {
                let username = m
                    .commercial_user_id
                    .and_then(|id| users.iter().find(|u| u.id == id))
                    .map(|u| u.username.as_str());
                if username != Some(assigned) {
                    return false;
                }
            }
            true
        })
        .collect()
}

// GET /api/admin/mappings
#[utoipa::path(
    get,
    path = "/api/admin/mappings",
    tag = "Admin",
    params(MappingFilters),
    responses(
        (status = 200, description = "Mapeamentos filtrados", body = Vec<CustomerCode>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_mappings(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapManageMappings>,
    Query(filters): Query<MappingFilters>,
) -> Result<Json<Vec<CustomerCode>>, AppError> {
    let mappings = app_state.code_repo.list_all().await?;
    let users = app_state.user_repo.list_all().await?;
    Ok(Json(filter_mappings(mappings, &filters, &users)))
}

// POST /api/admin/mappings
#[utoipa::path(
    post,
    path = "/api/admin/mappings",
    tag = "Admin",
    request_body = CreateMappingPayload,
    responses(
        (status = 201, description = "Mapeamento criado", body = CustomerCode),
        (status = 409, description = "Código já mapeado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_mapping(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapManageMappings>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Json(payload): Json<CreateMappingPayload>,
) -> Result<(StatusCode, Json<CustomerCode>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let mapping = app_state
        .code_repo
        .create(
            &payload.code,
            &payload.description,
            payload.commercial_user_id,
        )
        .await?;

    app_state
        .log_repo
        .append_pool(
            admin.id,
            &admin.username,
            "Add Mapping",
            &format!("Added mapping for {}", mapping.code),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(mapping)))
}

// PUT /api/admin/mappings/{id}
#[utoipa::path(
    put,
    path = "/api/admin/mappings/{id}",
    tag = "Admin",
    request_body = UpdateMappingPayload,
    responses(
        (status = 200, description = "Mapeamento atualizado", body = CustomerCode),
        (status = 404, description = "Mapeamento não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do mapeamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_mapping(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapManageMappings>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMappingPayload>,
) -> Result<Json<CustomerCode>, AppError> {
    let mapping = app_state
        .code_repo
        .update(id, &payload.description, payload.commercial_user_id)
        .await?;

    app_state
        .log_repo
        .append_pool(
            admin.id,
            &admin.username,
            "Update Mapping",
            &format!("Updated mapping for {}", mapping.code),
        )
        .await?;

    Ok(Json(mapping))
}

// DELETE /api/admin/mappings/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/mappings/{id}",
    tag = "Admin",
    responses(
        (status = 204, description = "Mapeamento removido"),
        (status = 404, description = "Mapeamento não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do mapeamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_mapping(
    State(app_state): State<AppState>,
    _cap: RequireCapability<CapManageMappings>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mapping = app_state.code_repo.delete(id).await?;

    app_state
        .log_repo
        .append_pool(
            admin.id,
            &admin.username,
            "Delete Mapping",
            &format!("Deleted mapping for {}", mapping.code),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use chrono::Utc;

    fn user(username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            full_name: username.to_string(),
            short_name: "CM1".to_string(),
            role: Role::Commercial,
            password: "secret".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn mapping(code: &str, commercial_user_id: Option<Uuid>) -> CustomerCode {
        CustomerCode {
            id: Uuid::new_v4(),
            code: code.to_string(),
            description: String::new(),
            commercial_user_id,
            status: "Active".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filters_by_code_fragment() {
        let rows = vec![mapping("CUST001", None), mapping("B00019-T", None)];
        let filters = MappingFilters {
            code: Some("cust".to_string()),
            ..Default::default()
        };
        let result = filter_mappings(rows, &filters, &[]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].code, "CUST001");
    }

    #[test]
    fn filters_by_assigned_username() {
        let comm = user("comm1");
        let rows = vec![mapping("CUST001", Some(comm.id)), mapping("CUST002", None)];
        let filters = MappingFilters {
            assigned_to: Some("comm1".to_string()),
            ..Default::default()
        };
        let result = filter_mappings(rows, &filters, std::slice::from_ref(&comm));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].code, "CUST001");
    }

    #[test]
    fn empty_filters_return_everything() {
        let rows = vec![mapping("CUST001", None), mapping("CUST002", None)];
        let result = filter_mappings(rows, &MappingFilters::default(), &[]);
        assert_eq!(result.len(), 2);
    }
}
