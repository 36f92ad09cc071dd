use std::sync::Arc;

use async_trait::async_trait;
use shared::services::game_events::{GameEvent, GameEventPublishError, GameEventPublisher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::coordinator::GameCoordinator;

/// Publisher used when the delayed-task poller runs inside the hub process:
/// events go straight onto the hub's event channel.
pub struct ChannelPublisher {
    tx: mpsc::UnboundedSender<GameEvent>,
}

impl ChannelPublisher {
    pub fn new(tx: mpsc::UnboundedSender<GameEvent>) -> Self {
        ChannelPublisher { tx }
    }
}

#[async_trait]
impl GameEventPublisher for ChannelPublisher {
    async fn publish(&self, event: GameEvent) -> Result<(), GameEventPublishError> {
        self.tx
            .send(event)
            .map_err(|e| GameEventPublishError::Delivery(e.to_string()))
    }
}

/// Drains the hub's event channel and hands each event to the coordinator.
pub fn spawn_event_loop(
    coordinator: Arc<GameCoordinator>,
    mut rx: mpsc::UnboundedReceiver<GameEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                GameEvent::AutoDeclined {
                    session_id,
                    player1_id,
                } => {
                    coordinator
                        .auto_decline_notify(&session_id, &player1_id)
                        .await;
                }
            }
        }
    })
}
