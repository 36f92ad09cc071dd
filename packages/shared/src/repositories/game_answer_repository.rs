use crate::models::game_answer::GameAnswer;
use crate::repositories::errors::game_answer_repository_errors::GameAnswerRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use aws_sdk_dynamodb::Client;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait GameAnswerRepository: Send + Sync {
    async fn create_answer(&self, answer: &GameAnswer) -> Result<(), GameAnswerRepositoryError>;

    /// Number of correct answers a user has submitted in a session. Scores are
    /// always derived from this count, never stored.
    async fn count_correct_answers(
        &self,
        game_session_id: &str,
        user_id: &str,
    ) -> Result<i64, GameAnswerRepositoryError>;
}

pub struct DynamoDbGameAnswerRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbGameAnswerRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("GAME_ANSWERS_TABLE")
            .expect("GAME_ANSWERS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl GameAnswerRepository for DynamoDbGameAnswerRepository {
    async fn create_answer(&self, answer: &GameAnswer) -> Result<(), GameAnswerRepositoryError> {
        let item = serde_dynamo::to_item(answer)
            .map_err(|e| GameAnswerRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| GameAnswerRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn count_correct_answers(
        &self,
        game_session_id: &str,
        user_id: &str,
    ) -> Result<i64, GameAnswerRepositoryError> {
        let mut total: i64 = 0;
        let mut last_evaluated_key = None;

        loop {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name("GSI_AnswersBySession")
                .key_condition_expression("game_session_id = :session_id")
                .filter_expression("user_id = :user_id AND is_correct = :correct")
                .expression_attribute_values(
                    ":session_id",
                    AttributeValue::S(game_session_id.to_string()),
                )
                .expression_attribute_values(":user_id", AttributeValue::S(user_id.to_string()))
                .expression_attribute_values(":correct", AttributeValue::Bool(true))
                .select(Select::Count)
                .set_exclusive_start_key(last_evaluated_key)
                .send()
                .await
                .map_err(|e| GameAnswerRepositoryError::DynamoDb(e.to_string()))?;

            total += result.count as i64;
            last_evaluated_key = result.last_evaluated_key;
            if last_evaluated_key.is_none() {
                break;
            }
        }

        Ok(total)
    }
}
