#[derive(Debug)]
pub enum WordRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for WordRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WordRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            WordRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for WordRepositoryError {}
