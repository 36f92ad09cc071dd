use crate::repositories::errors::scheduled_task_repository_errors::ScheduledTaskRepositoryError;

#[derive(Debug)]
pub enum SchedulerServiceError {
    RepositoryError(String),
}

impl std::fmt::Display for SchedulerServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for SchedulerServiceError {}

impl From<ScheduledTaskRepositoryError> for SchedulerServiceError {
    fn from(err: ScheduledTaskRepositoryError) -> Self {
        SchedulerServiceError::RepositoryError(err.to_string())
    }
}
