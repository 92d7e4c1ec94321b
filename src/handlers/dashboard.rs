// src/handlers/dashboard.rs

use axum::{Json, extract::State};

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    models::dashboard::DashboardData,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores, tendência de 7 dias e submissões recentes", body = DashboardData)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<DashboardData>, AppError> {
    let data = app_state.dashboard_service.overview(&user).await?;
    Ok(Json(data))
}
