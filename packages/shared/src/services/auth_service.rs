use std::sync::Arc;

use crate::models::user::User;
use crate::repositories::access_token_repository::AccessTokenRepository;
use crate::repositories::errors::user_repository_errors::UserRepositoryError;
use crate::repositories::user_repository::UserRepository;
use crate::services::errors::auth_service_errors::AuthServiceError;

/// Resolves opaque bearer tokens against the store. Token issuance lives in
/// the external auth backend; this side only looks tokens up.
#[derive(Clone)]
pub struct AuthService {
    tokens: Arc<dyn AccessTokenRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
}

impl AuthService {
    pub fn new(
        tokens: Arc<dyn AccessTokenRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        AuthService { tokens, users }
    }

    pub async fn resolve_token(&self, token: &str) -> Result<User, AuthServiceError> {
        let user_id = self
            .tokens
            .find_user_id(token)
            .await
            .map_err(|e| AuthServiceError::RepositoryError(e.to_string()))?
            .ok_or(AuthServiceError::InvalidToken)?;

        match self.users.get_user_by_id(&user_id).await {
            Ok(user) => Ok(user),
            Err(UserRepositoryError::NotFound) => Err(AuthServiceError::InvalidToken),
            Err(e) => Err(AuthServiceError::RepositoryError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::access_token_repository::MockAccessTokenRepository;
    use crate::repositories::user_repository::MockUserRepository;

    fn user_named(id: &str) -> User {
        let mut user = User::new(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "secret".to_string(),
        );
        user.id = id.to_string();
        user
    }

    #[tokio::test]
    async fn test_resolve_token_success() {
        let mut tokens = MockAccessTokenRepository::new();
        tokens
            .expect_find_user_id()
            .returning(|_| Ok(Some("user-1".to_string())));

        let mut users = MockUserRepository::new();
        users
            .expect_get_user_by_id()
            .returning(|id| Ok(user_named(id)));

        let service = AuthService::new(Arc::new(tokens), Arc::new(users));
        let user = service.resolve_token("token-abc").await.unwrap();
        assert_eq!(user.id, "user-1");
    }

    #[tokio::test]
    async fn test_resolve_unknown_token() {
        let mut tokens = MockAccessTokenRepository::new();
        tokens.expect_find_user_id().returning(|_| Ok(None));

        let mut users = MockUserRepository::new();
        users.expect_get_user_by_id().never();

        let service = AuthService::new(Arc::new(tokens), Arc::new(users));
        let result = service.resolve_token("bogus").await;
        assert!(matches!(result, Err(AuthServiceError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_resolve_token_with_vanished_user() {
        let mut tokens = MockAccessTokenRepository::new();
        tokens
            .expect_find_user_id()
            .returning(|_| Ok(Some("user-1".to_string())));

        let mut users = MockUserRepository::new();
        users
            .expect_get_user_by_id()
            .returning(|_| Err(UserRepositoryError::NotFound));

        let service = AuthService::new(Arc::new(tokens), Arc::new(users));
        let result = service.resolve_token("token-abc").await;
        assert!(matches!(result, Err(AuthServiceError::InvalidToken)));
    }
}
