//! Narrow view of one inbound activity plus the two things a handler may do with it.

use crate::activity::{Activity, ActivityKind, OutboundActivity};
use crate::channels::ChannelError;
use async_trait::async_trait;

/// One turn of the conversation: the inbound activity, reply, and delete-the-trigger.
#[async_trait]
pub trait TurnContext: Send + Sync {
    fn activity(&self) -> &Activity;

    fn kind(&self) -> ActivityKind {
        self.activity().kind()
    }

    /// Message text with the bot's own mention removed.
    fn text(&self) -> String {
        self.activity().text_without_recipient_mention()
    }

    fn sender_name(&self) -> &str {
        self.activity().sender_name()
    }

    fn action_value(&self) -> Option<&serde_json::Value> {
        self.activity().value()
    }

    /// Send a reply into the activity's conversation.
    async fn send(&self, reply: OutboundActivity) -> Result<(), ChannelError>;

    /// Delete the activity this one replies to (the card whose button was pressed).
    async fn delete_triggering_activity(&self) -> Result<(), ChannelError>;
}
