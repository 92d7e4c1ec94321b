// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger antes de qualquer outra coisa
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Sessão e perfil (protegidas)
    let session_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/users/me", get(handlers::auth::get_me))
        .route("/users/me/password", put(handlers::auth::change_password));

    // Submissão e revisão de instruções
    let instruction_routes = Router::new()
        .route(
            "/",
            get(handlers::instructions::list_instructions)
                .post(handlers::instructions::submit_instructions),
        )
        .route("/export", get(handlers::instructions::export_instructions))
        .route("/{id}", patch(handlers::instructions::update_instruction));

    // Administração: usuários, mapeamentos, configuração, dados.
    // A capacidade exigida é checada por handler (RequireCapability).
    let admin_routes = Router::new()
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .route("/users/{id}/status", put(handlers::users::toggle_user_status))
        .route(
            "/mappings",
            get(handlers::mappings::list_mappings).post(handlers::mappings::create_mapping),
        )
        .route(
            "/mappings/{id}",
            put(handlers::mappings::update_mapping).delete(handlers::mappings::delete_mapping),
        )
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route("/backup", get(handlers::settings::download_backup))
        .route("/cleanup", post(handlers::settings::run_cleanup));

    let ai_routes = Router::new()
        .route("/summary", post(handlers::ai::summary))
        .route("/polish", post(handlers::ai::polish));

    // Tudo que exige usuário autenticado passa pelo auth_guard
    let protected_routes = Router::new()
        .merge(session_routes)
        .nest("/instructions", instruction_routes)
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .nest("/admin", admin_routes)
        .route("/logs", get(handlers::logs::list_logs))
        .nest("/ai", ai_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!(
        "🚀 Servidor escutando em {}",
        listener.local_addr().expect("endereço local do listener")
    );
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
