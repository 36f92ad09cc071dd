#[derive(Debug)]
pub enum UserServiceError {
    UserNotFound,
    ValidationError(String),
    RepositoryError(String),
}

impl std::fmt::Display for UserServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserServiceError::UserNotFound => write!(f, "User not found"),
            UserServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            UserServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for UserServiceError {}
