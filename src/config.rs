// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        ActivityLogRepository, CustomerCodeRepository, DashboardRepository, InstructionRepository,
        SettingsRepository, UserRepository,
    },
    services::{
        ai::AiClient, auth::AuthService, dashboard_service::DashboardService,
        instruction_service::InstructionService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,

    pub user_repo: UserRepository,
    pub code_repo: CustomerCodeRepository,
    pub instruction_repo: InstructionRepository,
    pub settings_repo: SettingsRepository,
    pub log_repo: ActivityLogRepository,

    pub auth_service: AuthService,
    pub instruction_service: InstructionService,
    pub dashboard_service: DashboardService,
    pub ai_client: AiClient,
}

impl AppState {
    // Carrega as configurações, conecta ao banco e monta o grafo de dependências
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // A integração de IA é opcional: sem a chave, os endpoints caem no fallback
        let gemini_api_key = env::var("GEMINI_API_KEY").ok();
        if gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY ausente; assistente de texto operando em fallback");
        }

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o grafo de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let code_repo = CustomerCodeRepository::new(db_pool.clone());
        let instruction_repo = InstructionRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());
        let log_repo = ActivityLogRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), log_repo.clone(), jwt_secret);
        let instruction_service = InstructionService::new(
            db_pool.clone(),
            instruction_repo.clone(),
            code_repo.clone(),
            settings_repo.clone(),
            log_repo.clone(),
        );
        let dashboard_service = DashboardService::new(dashboard_repo);
        let ai_client = AiClient::new(gemini_api_key);

        Ok(Self {
            db_pool,
            user_repo,
            code_repo,
            instruction_repo,
            settings_repo,
            log_repo,
            auth_service,
            instruction_service,
            dashboard_service,
            ai_client,
        })
    }
}
