#[derive(Debug)]
pub enum GameSessionRepositoryError {
    Serialization(String),
    DynamoDb(String),
    /// The transactional create lost to an existing active-session lock for
    /// one of the participants.
    ActiveSessionExists,
    NotFound,
}

impl std::fmt::Display for GameSessionRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameSessionRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            GameSessionRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
            GameSessionRepositoryError::ActiveSessionExists => {
                write!(f, "A participant already has an active game session")
            }
            GameSessionRepositoryError::NotFound => write!(f, "Game session not found"),
        }
    }
}

impl std::error::Error for GameSessionRepositoryError {}
