//! MessagePusher trait 定義
//!
//! Outbound delivery to connected clients. Delivery is fire-and-forget: a
//! connection that has gone away simply misses the event, nothing is queued
//! for redelivery.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ServerEvent};

/// Channel carrying encoded frames to one connection's writer task
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Attach the outbound channel of a new connection
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Detach a connection's outbound channel
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Send an event to one connection
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// Send an event to every target, in order.
    ///
    /// Individual delivery failures are logged and skipped; only encoding
    /// failures are reported.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
