pub mod ai;
pub mod auth;
pub mod dashboard;
pub mod instructions;
pub mod logs;
pub mod mappings;
pub mod settings;
pub mod users;
