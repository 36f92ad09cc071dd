pub mod access_token_repository_errors;
pub mod game_answer_repository_errors;
pub mod game_session_repository_errors;
pub mod scheduled_task_repository_errors;
pub mod user_repository_errors;
pub mod word_repository_errors;
