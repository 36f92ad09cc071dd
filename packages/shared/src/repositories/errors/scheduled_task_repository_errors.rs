#[derive(Debug)]
pub enum ScheduledTaskRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for ScheduledTaskRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduledTaskRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ScheduledTaskRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for ScheduledTaskRepositoryError {}
