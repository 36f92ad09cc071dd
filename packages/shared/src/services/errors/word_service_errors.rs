#[derive(Debug)]
pub enum WordServiceError {
    RepositoryError(String),
}

impl std::fmt::Display for WordServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WordServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for WordServiceError {}
