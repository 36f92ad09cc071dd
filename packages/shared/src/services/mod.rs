pub mod auth_service;
pub mod errors;
pub mod game_events;
pub mod game_session_service;
pub mod scheduler_service;
pub mod user_service;
pub mod word_service;
