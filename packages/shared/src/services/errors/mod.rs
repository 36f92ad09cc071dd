pub mod auth_service_errors;
pub mod game_session_service_errors;
pub mod scheduler_service_errors;
pub mod user_service_errors;
pub mod word_service_errors;
