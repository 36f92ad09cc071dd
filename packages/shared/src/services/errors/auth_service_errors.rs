#[derive(Debug)]
pub enum AuthServiceError {
    /// Token missing from the store or its user record is gone. Socket auth
    /// treats this as a silent failure; the API maps it to 401.
    InvalidToken,
    RepositoryError(String),
}

impl std::fmt::Display for AuthServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthServiceError::InvalidToken => write!(f, "Invalid or unknown access token"),
            AuthServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for AuthServiceError {}
