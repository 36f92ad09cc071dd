use crate::repositories::errors::access_token_repository_errors::AccessTokenRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

#[cfg(test)]
use mockall::automock;

/// Lookup table for opaque bearer tokens issued by the (external) auth
/// backend. The hub and the API only ever read it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    async fn find_user_id(&self, token: &str)
        -> Result<Option<String>, AccessTokenRepositoryError>;
}

pub struct DynamoDbAccessTokenRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbAccessTokenRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("ACCESS_TOKENS_TABLE")
            .expect("ACCESS_TOKENS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl AccessTokenRepository for DynamoDbAccessTokenRepository {
    async fn find_user_id(
        &self,
        token: &str,
    ) -> Result<Option<String>, AccessTokenRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("token", AttributeValue::S(token.to_string()))
            .send()
            .await
            .map_err(|e| AccessTokenRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = result.item {
            if let Some(AttributeValue::S(user_id)) = item.get("user_id") {
                return Ok(Some(user_id.clone()));
            }
        }

        Ok(None)
    }
}
