pub mod activity_log_repo;
pub use activity_log_repo::ActivityLogRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod customer_code_repo;
pub use customer_code_repo::CustomerCodeRepository;
pub mod instruction_repo;
pub use instruction_repo::InstructionRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
