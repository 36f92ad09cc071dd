#[derive(Debug)]
pub enum GameAnswerRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for GameAnswerRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameAnswerRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            GameAnswerRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for GameAnswerRepositoryError {}
