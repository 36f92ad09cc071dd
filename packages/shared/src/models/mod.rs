pub mod game_answer;
pub mod game_session;
pub mod scheduled_task;
pub mod user;
pub mod word;
