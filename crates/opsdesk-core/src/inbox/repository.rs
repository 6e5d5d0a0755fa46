//! Inbox data-source trait.
//!
//! Defines the interface for conversation retrieval and outbound delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::{Attachment, Conversation, ConversationFilter, Message};
use crate::error::Result;
use crate::quick_action::{QuickAction, QuickActionOutcome};

/// One page of the conversation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationPage {
    /// Conversations matching the filter, most recent activity first
    pub conversations: Vec<Conversation>,
    /// Number of conversations matching the filter
    pub total: usize,
    /// Unread messages across the whole non-archived inbox
    pub unread_total: u32,
}

/// A conversation together with its full message list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    /// Messages ordered by creation time
    pub messages: Vec<Message>,
}

/// An abstract source of inbox data.
///
/// This trait decouples the chat session from the specific backend
/// (in-memory fixture, remote HTTP service). Implementations own retries
/// and timeouts; callers own error reporting.
#[async_trait]
pub trait InboxDataSource: Send + Sync {
    /// Lists conversations matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or rejects the
    /// request.
    async fn list_conversations(&self, filter: &ConversationFilter) -> Result<ConversationPage>;

    /// Fetches a conversation and its messages.
    ///
    /// Fetching marks the conversation read on the backend.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error for an unknown conversation id.
    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationDetail>;

    /// Sends an outbound message to a conversation.
    ///
    /// # Returns
    ///
    /// The delivered message as recorded by the backend, including its
    /// assigned id, timestamps and delivery status.
    async fn send_message(
        &self,
        conversation_id: &str,
        content: &str,
        attachments: Vec<Attachment>,
    ) -> Result<Message>;

    /// Runs a quick action against a conversation.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error for an unknown conversation id.
    async fn quick_action(
        &self,
        conversation_id: &str,
        action: QuickAction,
        data: Option<serde_json::Value>,
    ) -> Result<QuickActionOutcome>;
}
