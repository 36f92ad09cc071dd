pub mod access_token_repository;
pub mod errors;
pub mod game_answer_repository;
pub mod game_session_repository;
pub mod scheduled_task_repository;
pub mod user_repository;
pub mod word_repository;
