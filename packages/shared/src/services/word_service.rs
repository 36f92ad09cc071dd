use std::sync::Arc;

use crate::models::word::Word;
use crate::repositories::word_repository::WordRepository;
use crate::services::errors::word_service_errors::WordServiceError;

/// Number of words handed to a game session's quiz round.
pub const QUIZ_BATCH_SIZE: usize = 5;

#[derive(Clone)]
pub struct WordService {
    repository: Arc<dyn WordRepository + Send + Sync>,
}

impl WordService {
    pub fn new(repository: Arc<dyn WordRepository + Send + Sync>) -> Self {
        WordService { repository }
    }

    pub async fn quiz_batch(&self) -> Result<Vec<Word>, WordServiceError> {
        self.repository
            .quiz_batch(QUIZ_BATCH_SIZE)
            .await
            .map_err(|e| WordServiceError::RepositoryError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::word_repository::MockWordRepository;

    #[tokio::test]
    async fn test_quiz_batch_requests_five_words() {
        let mut repository = MockWordRepository::new();
        repository
            .expect_quiz_batch()
            .withf(|count| *count == QUIZ_BATCH_SIZE)
            .returning(|_| Ok(Vec::new()));

        let service = WordService::new(Arc::new(repository));
        assert!(service.quiz_batch().await.unwrap().is_empty());
    }
}
