use std::sync::Arc;

use crate::models::user::User;
use crate::repositories::errors::user_repository_errors::UserRepositoryError;
use crate::repositories::user_repository::UserRepository;
use crate::services::errors::user_service_errors::UserServiceError;

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>) -> Self {
        UserService { repository }
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<User, UserServiceError> {
        if user_id.is_empty() {
            return Err(UserServiceError::ValidationError(
                "User ID cannot be empty".to_string(),
            ));
        }
        self.repository
            .get_user_by_id(user_id)
            .await
            .map_err(Self::map_error)
    }

    pub async fn set_online_status(
        &self,
        user_id: &str,
        is_online: bool,
    ) -> Result<User, UserServiceError> {
        self.repository
            .set_online_status(user_id, is_online)
            .await
            .map_err(Self::map_error)
    }

    fn map_error(err: UserRepositoryError) -> UserServiceError {
        match err {
            UserRepositoryError::NotFound => UserServiceError::UserNotFound,
            other => UserServiceError::RepositoryError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::MockUserRepository;

    #[tokio::test]
    async fn test_get_user_rejects_empty_id() {
        let mut repository = MockUserRepository::new();
        repository.expect_get_user_by_id().never();

        let service = UserService::new(Arc::new(repository));
        let result = service.get_user_by_id("").await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_set_online_status_maps_not_found() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_set_online_status()
            .returning(|_, _| Err(UserRepositoryError::NotFound));

        let service = UserService::new(Arc::new(repository));
        let result = service.set_online_status("user-1", true).await;
        assert!(matches!(result, Err(UserServiceError::UserNotFound)));
    }
}
