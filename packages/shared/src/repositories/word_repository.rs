use crate::models::word::Word;
use crate::repositories::errors::word_repository_errors::WordRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use rand::seq::SliceRandom;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait WordRepository: Send + Sync {
    /// A random batch of quiz words, each carrying exactly two sentences.
    async fn quiz_batch(&self, count: usize) -> Result<Vec<Word>, WordRepositoryError>;
}

pub struct DynamoDbWordRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbWordRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("WORDS_TABLE").expect("WORDS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl WordRepository for DynamoDbWordRepository {
    async fn quiz_batch(&self, count: usize) -> Result<Vec<Word>, WordRepositoryError> {
        let mut words = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let result = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("size(sentences) = :two")
                .expression_attribute_values(":two", AttributeValue::N("2".to_string()))
                .set_exclusive_start_key(last_evaluated_key)
                .send()
                .await
                .map_err(|e| WordRepositoryError::DynamoDb(e.to_string()))?;

            for item in result.items.unwrap_or_default() {
                let word: Word = serde_dynamo::from_item(item)
                    .map_err(|e| WordRepositoryError::Serialization(e.to_string()))?;
                words.push(word);
            }

            last_evaluated_key = result.last_evaluated_key;
            if last_evaluated_key.is_none() {
                break;
            }
        }

        words.shuffle(&mut rand::thread_rng());
        words.truncate(count);
        Ok(words)
    }
}
