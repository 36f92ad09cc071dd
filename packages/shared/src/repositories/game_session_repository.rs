use crate::models::game_session::{GameSession, PlayerSlot};
use crate::repositories::errors::game_session_repository_errors::GameSessionRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, Put, TransactWriteItem, Update};
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

/// Timestamps written through update expressions must use the same encoding
/// serde_dynamo uses for the model fields.
fn now_value(now: DateTime<Utc>) -> Result<AttributeValue, GameSessionRepositoryError> {
    serde_dynamo::to_attribute_value(now)
        .map_err(|e| GameSessionRepositoryError::Serialization(e.to_string()))
}

/// Durable store for game sessions.
///
/// The "at most one open session per user" invariant is enforced here, not by
/// callers: `create_game_session` writes an `active#<user_id>` lock item per
/// participant in the same transaction as the session, guarded by
/// `attribute_not_exists`. Deleting or completing a session releases the locks
/// in the same transaction. Conditional mutations report "lost the condition"
/// as a value (`false` / `NotFound` / `ActiveSessionExists`) rather than an
/// error so callers can treat them as ordinary no-ops.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GameSessionRepository: Send + Sync {
    async fn create_game_session(
        &self,
        session: &GameSession,
    ) -> Result<(), GameSessionRepositoryError>;

    async fn get_game_session(
        &self,
        session_id: &str,
    ) -> Result<Option<GameSession>, GameSessionRepositoryError>;

    /// Transition `(pending, pending)` to `(active, accepted)` and return the
    /// new image.
    async fn accept_game_session(
        &self,
        session_id: &str,
    ) -> Result<GameSession, GameSessionRepositoryError>;

    /// Atomically set one player's finished flag and return the new image, so
    /// two `isLast` submissions arriving in any order never lose an update.
    async fn mark_player_finished(
        &self,
        session_id: &str,
        slot: PlayerSlot,
    ) -> Result<GameSession, GameSessionRepositoryError>;

    /// Transition to `(completed, completed)` and release the participant
    /// locks. Returns `false` if the session is gone or already completed.
    async fn complete_game_session(
        &self,
        session: &GameSession,
    ) -> Result<bool, GameSessionRepositoryError>;

    /// Delete the session and release the participant locks. Returns `false`
    /// if the session no longer exists.
    async fn delete_game_session(
        &self,
        session: &GameSession,
    ) -> Result<bool, GameSessionRepositoryError>;

    /// Delete only if the session is still `(pending, pending)`: the
    /// fire-and-check guard of the auto-decline job. Returns `false` if the
    /// session transitioned or vanished in the meantime.
    async fn delete_if_still_pending(
        &self,
        session: &GameSession,
    ) -> Result<bool, GameSessionRepositoryError>;

    /// Resolve the user's open (pending/active) session through their lock
    /// item, if any.
    async fn find_open_session_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<GameSession>, GameSessionRepositoryError>;

    /// Every session the user has participated in, newest first.
    async fn list_sessions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<GameSession>, GameSessionRepositoryError>;
}

pub struct DynamoDbGameSessionRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbGameSessionRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("GAME_SESSIONS_TABLE")
            .expect("GAME_SESSIONS_TABLE environment variable must be set");
        Self { client, table_name }
    }

    fn lock_key(user_id: &str) -> String {
        format!("active#{}", user_id)
    }

    fn participants(session: &GameSession) -> Vec<&str> {
        let mut ids = vec![session.player1_id.as_str()];
        if let Some(player2_id) = session.player2_id.as_deref() {
            if player2_id != session.player1_id {
                ids.push(player2_id);
            }
        }
        ids
    }

    fn lock_put(&self, user_id: &str, session_id: &str) -> Result<Put, GameSessionRepositoryError> {
        Put::builder()
            .table_name(&self.table_name)
            .item(
                "session_id",
                AttributeValue::S(Self::lock_key(user_id)),
            )
            .item(
                "locked_session_id",
                AttributeValue::S(session_id.to_string()),
            )
            .condition_expression("attribute_not_exists(session_id)")
            .build()
            .map_err(|e| GameSessionRepositoryError::DynamoDb(e.to_string()))
    }

    fn lock_delete(&self, user_id: &str) -> Result<Delete, GameSessionRepositoryError> {
        Delete::builder()
            .table_name(&self.table_name)
            .key("session_id", AttributeValue::S(Self::lock_key(user_id)))
            .build()
            .map_err(|e| GameSessionRepositoryError::DynamoDb(e.to_string()))
    }

    async fn run_transaction(
        &self,
        items: Vec<TransactWriteItem>,
    ) -> Result<bool, GameSessionRepositoryError> {
        let result = self
            .client
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_transaction_canceled_exception() {
                    Ok(false)
                } else {
                    Err(GameSessionRepositoryError::DynamoDb(
                        service_error.to_string(),
                    ))
                }
            }
        }
    }
}

#[async_trait]
impl GameSessionRepository for DynamoDbGameSessionRepository {
    async fn create_game_session(
        &self,
        session: &GameSession,
    ) -> Result<(), GameSessionRepositoryError> {
        let item = serde_dynamo::to_item(session)
            .map_err(|e| GameSessionRepositoryError::Serialization(e.to_string()))?;

        let session_put = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(session_id)")
            .build()
            .map_err(|e| GameSessionRepositoryError::DynamoDb(e.to_string()))?;

        let mut items = vec![TransactWriteItem::builder().put(session_put).build()];
        for user_id in Self::participants(session) {
            items.push(
                TransactWriteItem::builder()
                    .put(self.lock_put(user_id, &session.session_id)?)
                    .build(),
            );
        }

        if self.run_transaction(items).await? {
            tracing::debug!("Stored game session {}", session.session_id);
            Ok(())
        } else {
            Err(GameSessionRepositoryError::ActiveSessionExists)
        }
    }

    async fn get_game_session(
        &self,
        session_id: &str,
    ) -> Result<Option<GameSession>, GameSessionRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("session_id", AttributeValue::S(session_id.to_string()))
            .send()
            .await
            .map_err(|e| GameSessionRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = result.item {
            let session: GameSession = serde_dynamo::from_item(item)
                .map_err(|e| GameSessionRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(session))
        } else {
            Ok(None)
        }
    }

    async fn accept_game_session(
        &self,
        session_id: &str,
    ) -> Result<GameSession, GameSessionRepositoryError> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("session_id", AttributeValue::S(session_id.to_string()))
            .update_expression("SET #status = :active, game_status = :accepted, updated_at = :now")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(":active", AttributeValue::S("active".to_string()))
            .expression_attribute_values(":accepted", AttributeValue::S("accepted".to_string()))
            .expression_attribute_values(":now", now_value(Utc::now())?)
            .condition_expression("attribute_exists(session_id)")
            .return_values(aws_sdk_dynamodb::types::ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => {
                let attributes = output
                    .attributes
                    .ok_or(GameSessionRepositoryError::NotFound)?;
                serde_dynamo::from_item(attributes)
                    .map_err(|e| GameSessionRepositoryError::Serialization(e.to_string()))
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    Err(GameSessionRepositoryError::NotFound)
                } else {
                    Err(GameSessionRepositoryError::DynamoDb(
                        service_error.to_string(),
                    ))
                }
            }
        }
    }

    async fn mark_player_finished(
        &self,
        session_id: &str,
        slot: PlayerSlot,
    ) -> Result<GameSession, GameSessionRepositoryError> {
        let flag = match slot {
            PlayerSlot::Player1 => "is_player1_finished",
            PlayerSlot::Player2 => "is_player2_finished",
        };

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("session_id", AttributeValue::S(session_id.to_string()))
            .update_expression(format!("SET {} = :finished, updated_at = :now", flag))
            .expression_attribute_values(":finished", AttributeValue::Bool(true))
            .expression_attribute_values(":now", now_value(Utc::now())?)
            .condition_expression("attribute_exists(session_id)")
            .return_values(aws_sdk_dynamodb::types::ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => {
                let attributes = output
                    .attributes
                    .ok_or(GameSessionRepositoryError::NotFound)?;
                serde_dynamo::from_item(attributes)
                    .map_err(|e| GameSessionRepositoryError::Serialization(e.to_string()))
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    Err(GameSessionRepositoryError::NotFound)
                } else {
                    Err(GameSessionRepositoryError::DynamoDb(
                        service_error.to_string(),
                    ))
                }
            }
        }
    }

    async fn complete_game_session(
        &self,
        session: &GameSession,
    ) -> Result<bool, GameSessionRepositoryError> {
        let complete_update = Update::builder()
            .table_name(&self.table_name)
            .key(
                "session_id",
                AttributeValue::S(session.session_id.clone()),
            )
            .update_expression(
                "SET #status = :completed, game_status = :completed, updated_at = :now",
            )
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(":completed", AttributeValue::S("completed".to_string()))
            .expression_attribute_values(":now", now_value(Utc::now())?)
            .condition_expression("attribute_exists(session_id) AND #status <> :completed")
            .build()
            .map_err(|e| GameSessionRepositoryError::DynamoDb(e.to_string()))?;

        let mut items = vec![TransactWriteItem::builder().update(complete_update).build()];
        for user_id in Self::participants(session) {
            items.push(
                TransactWriteItem::builder()
                    .delete(self.lock_delete(user_id)?)
                    .build(),
            );
        }

        self.run_transaction(items).await
    }

    async fn delete_game_session(
        &self,
        session: &GameSession,
    ) -> Result<bool, GameSessionRepositoryError> {
        let session_delete = Delete::builder()
            .table_name(&self.table_name)
            .key(
                "session_id",
                AttributeValue::S(session.session_id.clone()),
            )
            .condition_expression("attribute_exists(session_id)")
            .build()
            .map_err(|e| GameSessionRepositoryError::DynamoDb(e.to_string()))?;

        let mut items = vec![TransactWriteItem::builder().delete(session_delete).build()];
        for user_id in Self::participants(session) {
            items.push(
                TransactWriteItem::builder()
                    .delete(self.lock_delete(user_id)?)
                    .build(),
            );
        }

        self.run_transaction(items).await
    }

    async fn delete_if_still_pending(
        &self,
        session: &GameSession,
    ) -> Result<bool, GameSessionRepositoryError> {
        let session_delete = Delete::builder()
            .table_name(&self.table_name)
            .key(
                "session_id",
                AttributeValue::S(session.session_id.clone()),
            )
            .condition_expression(
                "attribute_exists(session_id) AND #status = :pending AND game_status = :pending",
            )
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(":pending", AttributeValue::S("pending".to_string()))
            .build()
            .map_err(|e| GameSessionRepositoryError::DynamoDb(e.to_string()))?;

        let mut items = vec![TransactWriteItem::builder().delete(session_delete).build()];
        for user_id in Self::participants(session) {
            items.push(
                TransactWriteItem::builder()
                    .delete(self.lock_delete(user_id)?)
                    .build(),
            );
        }

        self.run_transaction(items).await
    }

    async fn find_open_session_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<GameSession>, GameSessionRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("session_id", AttributeValue::S(Self::lock_key(user_id)))
            .send()
            .await
            .map_err(|e| GameSessionRepositoryError::DynamoDb(e.to_string()))?;

        let Some(item) = result.item else {
            return Ok(None);
        };

        match item.get("locked_session_id") {
            Some(AttributeValue::S(session_id)) => self.get_game_session(session_id).await,
            _ => Ok(None),
        }
    }

    async fn list_sessions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<GameSession>, GameSessionRepositoryError> {
        let mut sessions = Vec::new();

        for (index_name, key_attribute) in [
            ("GSI_SessionsByPlayer1", "player1_id"),
            ("GSI_SessionsByPlayer2", "player2_id"),
        ] {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(index_name)
                .key_condition_expression(format!("{} = :user_id", key_attribute))
                .expression_attribute_values(":user_id", AttributeValue::S(user_id.to_string()))
                .send()
                .await
                .map_err(|e| GameSessionRepositoryError::DynamoDb(e.to_string()))?;

            for item in result.items.unwrap_or_default() {
                let session: GameSession = serde_dynamo::from_item(item)
                    .map_err(|e| GameSessionRepositoryError::Serialization(e.to_string()))?;
                sessions.push(session);
            }
        }

        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_key_format() {
        assert_eq!(
            DynamoDbGameSessionRepository::lock_key("user-1"),
            "active#user-1"
        );
    }

    #[test]
    fn test_participants_deduplicates_self_game() {
        let session = GameSession::new("p1", "p1");
        assert_eq!(DynamoDbGameSessionRepository::participants(&session), vec!["p1"]);

        let session = GameSession::new("p1", "p2");
        assert_eq!(
            DynamoDbGameSessionRepository::participants(&session),
            vec!["p1", "p2"]
        );
    }

    #[test]
    fn test_participants_without_player2() {
        let mut session = GameSession::new("p1", "p2");
        session.player2_id = None;
        assert_eq!(DynamoDbGameSessionRepository::participants(&session), vec!["p1"]);
    }
}
