pub mod activity_log;
pub mod auth;
pub mod customer_code;
pub mod dashboard;
pub mod instruction;
pub mod settings;
