use shared::services::errors::game_session_service_errors::GameSessionServiceError;
use shared::services::errors::scheduler_service_errors::SchedulerServiceError;
use shared::services::errors::user_service_errors::UserServiceError;

/// Outcome of a game action that did not go through. Advisory variants carry
/// the exact string shown to the offending connection; `Service` is logged at
/// the dispatch boundary and never reaches a client.
#[derive(Debug)]
pub enum GameFlowError {
    AlreadyInGame,
    OpponentBusy,
    NotAuthorizedToAccept,
    NotAuthorizedToDecline,
    NotAuthorizedToEnd,
    SessionNotFound,
    Service(String),
}

impl GameFlowError {
    pub fn advisory_message(&self) -> Option<&'static str> {
        match self {
            GameFlowError::AlreadyInGame => Some("You already have an active game"),
            GameFlowError::OpponentBusy => Some("Opponent already has an active game"),
            GameFlowError::NotAuthorizedToAccept => {
                Some("You are not authorized to accept this game")
            }
            GameFlowError::NotAuthorizedToDecline => {
                Some("You are not authorized to decline this game")
            }
            GameFlowError::NotAuthorizedToEnd => Some("You are not authorized to end this game"),
            GameFlowError::SessionNotFound => Some("No active game session found"),
            GameFlowError::Service(_) => None,
        }
    }
}

impl std::fmt::Display for GameFlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameFlowError::Service(msg) => write!(f, "Service error: {}", msg),
            advisory => write!(f, "{}", advisory.advisory_message().unwrap_or_default()),
        }
    }
}

impl std::error::Error for GameFlowError {}

impl From<GameSessionServiceError> for GameFlowError {
    fn from(err: GameSessionServiceError) -> Self {
        match err {
            GameSessionServiceError::ActiveSessionExists => GameFlowError::AlreadyInGame,
            GameSessionServiceError::NotFound => GameFlowError::SessionNotFound,
            other => GameFlowError::Service(other.to_string()),
        }
    }
}

impl From<UserServiceError> for GameFlowError {
    fn from(err: UserServiceError) -> Self {
        GameFlowError::Service(err.to_string())
    }
}

impl From<SchedulerServiceError> for GameFlowError {
    fn from(err: SchedulerServiceError) -> Self {
        GameFlowError::Service(err.to_string())
    }
}
