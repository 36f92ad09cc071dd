use crate::repositories::errors::game_answer_repository_errors::GameAnswerRepositoryError;
use crate::repositories::errors::game_session_repository_errors::GameSessionRepositoryError;

#[derive(Debug)]
pub enum GameSessionServiceError {
    /// The store-level one-open-session-per-user constraint rejected a create.
    ActiveSessionExists,
    NotFound,
    RepositoryError(String),
}

impl std::fmt::Display for GameSessionServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameSessionServiceError::ActiveSessionExists => {
                write!(f, "A participant already has an active game session")
            }
            GameSessionServiceError::NotFound => write!(f, "Game session not found"),
            GameSessionServiceError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
        }
    }
}

impl std::error::Error for GameSessionServiceError {}

impl From<GameSessionRepositoryError> for GameSessionServiceError {
    fn from(err: GameSessionRepositoryError) -> Self {
        match err {
            GameSessionRepositoryError::ActiveSessionExists => {
                GameSessionServiceError::ActiveSessionExists
            }
            GameSessionRepositoryError::NotFound => GameSessionServiceError::NotFound,
            other => GameSessionServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<GameAnswerRepositoryError> for GameSessionServiceError {
    fn from(err: GameAnswerRepositoryError) -> Self {
        GameSessionServiceError::RepositoryError(err.to_string())
    }
}
