#[derive(Debug)]
pub enum AccessTokenRepositoryError {
    DynamoDb(String),
}

impl std::fmt::Display for AccessTokenRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessTokenRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for AccessTokenRepositoryError {}
