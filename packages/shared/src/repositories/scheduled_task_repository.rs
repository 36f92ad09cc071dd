use crate::models::scheduled_task::ScheduledTask;
use crate::repositories::errors::scheduled_task_repository_errors::ScheduledTaskRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

/// Durable queue of delayed work. Tasks outlive the process that scheduled
/// them; a poller claims each due task before executing it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ScheduledTaskRepository: Send + Sync {
    async fn put_task(&self, task: &ScheduledTask) -> Result<(), ScheduledTaskRepositoryError>;

    async fn due_tasks(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScheduledTask>, ScheduledTaskRepositoryError>;

    /// Conditional delete. `true` means this caller owns the task; `false`
    /// means another runner claimed it first.
    async fn claim_task(&self, task_id: &str) -> Result<bool, ScheduledTaskRepositoryError>;
}

pub struct DynamoDbScheduledTaskRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbScheduledTaskRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("SCHEDULED_TASKS_TABLE")
            .expect("SCHEDULED_TASKS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl ScheduledTaskRepository for DynamoDbScheduledTaskRepository {
    async fn put_task(&self, task: &ScheduledTask) -> Result<(), ScheduledTaskRepositoryError> {
        let item = serde_dynamo::to_item(task)
            .map_err(|e| ScheduledTaskRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| ScheduledTaskRepositoryError::DynamoDb(e.to_string()))?;

        tracing::debug!(
            "Scheduled {:?} task {} to fire at {}",
            task.kind,
            task.task_id,
            task.fire_at
        );
        Ok(())
    }

    async fn due_tasks(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScheduledTask>, ScheduledTaskRepositoryError> {
        let mut tasks = Vec::new();
        let mut last_evaluated_key = None;

        // Encode `now` exactly as stored fire_at values are encoded, so the
        // string comparison in the filter is a timestamp comparison.
        let now_value: AttributeValue = serde_dynamo::to_attribute_value(now)
            .map_err(|e| ScheduledTaskRepositoryError::Serialization(e.to_string()))?;

        loop {
            let result = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("fire_at <= :now")
                .expression_attribute_values(":now", now_value.clone())
                .set_exclusive_start_key(last_evaluated_key)
                .send()
                .await
                .map_err(|e| ScheduledTaskRepositoryError::DynamoDb(e.to_string()))?;

            for item in result.items.unwrap_or_default() {
                let task: ScheduledTask = serde_dynamo::from_item(item)
                    .map_err(|e| ScheduledTaskRepositoryError::Serialization(e.to_string()))?;
                tasks.push(task);
            }

            last_evaluated_key = result.last_evaluated_key;
            if last_evaluated_key.is_none() {
                break;
            }
        }

        Ok(tasks)
    }

    async fn claim_task(&self, task_id: &str) -> Result<bool, ScheduledTaskRepositoryError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("task_id", AttributeValue::S(task_id.to_string()))
            .condition_expression("attribute_exists(task_id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    Ok(false)
                } else {
                    Err(ScheduledTaskRepositoryError::DynamoDb(
                        service_error.to_string(),
                    ))
                }
            }
        }
    }
}
