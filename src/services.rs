pub mod ai;
pub mod auth;
pub mod dashboard_service;
pub mod instruction_service;
