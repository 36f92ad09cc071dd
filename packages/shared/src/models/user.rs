use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
    pub is_online: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile view sent over the socket and the API. The password never leaves
/// the store layer in any other shape.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub is_online: bool,
}

impl User {
    pub fn new(name: String, email: String, password: String) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password,
            avatar: None,
            is_online: false,
            created_at: Utc::now(),
        }
    }

    pub fn public_profile(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
            is_online: self.is_online,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "secret".to_string(),
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = sample_user();

        assert!(!user.id.is_empty());
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@example.com");
        assert!(user.avatar.is_none());
        assert!(!user.is_online);
    }

    #[test]
    fn test_public_profile_hides_password() {
        let user = sample_user();
        let public = user.public_profile();

        let serialized = serde_json::to_string(&public).unwrap();
        assert!(!serialized.contains("secret"));
        assert!(serialized.contains("alice@example.com"));
        assert_eq!(public.id, user.id);
        assert_eq!(public.is_online, user.is_online);
    }

    #[test]
    fn test_user_id_uniqueness() {
        let user1 = sample_user();
        let user2 = sample_user();

        assert_ne!(user1.id, user2.id);
    }
}
