use crate::models::user::User;
use crate::repositories::errors::user_repository_errors::UserRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::from_item;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user_by_id(&self, user_id: &str) -> Result<User, UserRepositoryError>;

    /// Flip the durable presence flag and return the updated record. Uses a
    /// field-level update so it never clobbers concurrent profile writes.
    async fn set_online_status(
        &self,
        user_id: &str,
        is_online: bool,
    ) -> Result<User, UserRepositoryError>;
}

pub struct DynamoDbUserRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbUserRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("USERS_TABLE").expect("USERS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl UserRepository for DynamoDbUserRepository {
    async fn get_user_by_id(&self, user_id: &str) -> Result<User, UserRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| UserRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let user: User =
                from_item(item).map_err(|e| UserRepositoryError::Serialization(e.to_string()))?;
            Ok(user)
        } else {
            Err(UserRepositoryError::NotFound)
        }
    }

    async fn set_online_status(
        &self,
        user_id: &str,
        is_online: bool,
    ) -> Result<User, UserRepositoryError> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(user_id.to_string()))
            .update_expression("SET is_online = :is_online")
            .expression_attribute_values(":is_online", AttributeValue::Bool(is_online))
            .condition_expression("attribute_exists(id)")
            .return_values(aws_sdk_dynamodb::types::ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => {
                let attributes = output.attributes.ok_or(UserRepositoryError::NotFound)?;
                from_item(attributes)
                    .map_err(|e| UserRepositoryError::Serialization(e.to_string()))
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    Err(UserRepositoryError::NotFound)
                } else {
                    Err(UserRepositoryError::DynamoDb(service_error.to_string()))
                }
            }
        }
    }
}
