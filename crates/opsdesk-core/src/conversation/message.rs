//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation,
//! including direction, content type and the delivery status lifecycle.

use serde::{Deserialize, Serialize};

/// Direction of a message relative to the inbox owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Message received from the contact.
    Inbound,
    /// Message sent by the inbox owner.
    Outbound,
}

/// Content type of a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Html,
    File,
}

/// Delivery status of an outbound message.
///
/// The lifecycle is `Queued -> Sent -> Read`, with `Failed` as a terminal
/// branch off `Queued`. Transitions never move backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Queued,
    Sent,
    Read,
    Failed,
}

impl DeliveryStatus {
    /// Returns true if moving from `self` to `next` is a legal transition.
    pub fn can_advance_to(self, next: DeliveryStatus) -> bool {
        matches!(
            (self, next),
            (DeliveryStatus::Queued, DeliveryStatus::Sent)
                | (DeliveryStatus::Sent, DeliveryStatus::Read)
                | (DeliveryStatus::Queued, DeliveryStatus::Failed)
        )
    }

    /// Returns true if no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryStatus::Read | DeliveryStatus::Failed)
    }
}

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// A single message in a conversation.
///
/// Messages within a conversation are totally ordered by `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier
    pub id: String,
    /// Identifier of the owning conversation
    pub conversation_id: String,
    /// Whether the message was received or sent
    pub direction: Direction,
    /// Content type of the body
    pub content_type: ContentType,
    /// Message body
    pub content: String,
    /// Delivery status
    pub status: DeliveryStatus,
    /// Ordered attachments
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Timestamp when the message was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the message was sent (ISO 8601 format)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
}

impl Message {
    /// Creates a new outbound text message in the `Queued` state.
    pub fn outbound_text(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            direction: Direction::Outbound,
            content_type: ContentType::Text,
            content: content.into(),
            status: DeliveryStatus::Queued,
            attachments: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
            sent_at: None,
        }
    }

    /// Advances the delivery status if the transition is legal.
    ///
    /// Records `sent_at` on the `Queued -> Sent` transition.
    ///
    /// # Returns
    ///
    /// `true` if the status changed, `false` if the transition was illegal.
    pub fn advance_status(&mut self, next: DeliveryStatus) -> bool {
        if !self.status.can_advance_to(next) {
            return false;
        }
        if next == DeliveryStatus::Sent {
            self.sent_at = Some(chrono::Utc::now().to_rfc3339());
        }
        self.status = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_status_happy_path() {
        let mut message = Message::outbound_text("c1", "hello");
        assert_eq!(message.status, DeliveryStatus::Queued);
        assert!(message.advance_status(DeliveryStatus::Sent));
        assert!(message.sent_at.is_some());
        assert!(message.advance_status(DeliveryStatus::Read));
        assert!(message.status.is_terminal());
    }

    #[test]
    fn test_delivery_status_failure_branch() {
        let mut message = Message::outbound_text("c1", "hello");
        assert!(message.advance_status(DeliveryStatus::Failed));
        assert_eq!(message.status, DeliveryStatus::Failed);
        assert!(message.sent_at.is_none());
        // Terminal: nothing moves out of Failed.
        assert!(!message.advance_status(DeliveryStatus::Sent));
        assert!(!message.advance_status(DeliveryStatus::Read));
    }

    #[test]
    fn test_delivery_status_never_moves_backwards() {
        let mut message = Message::outbound_text("c1", "hello");
        message.advance_status(DeliveryStatus::Sent);
        assert!(!message.advance_status(DeliveryStatus::Queued));
        // Failed is only reachable from Queued.
        assert!(!message.advance_status(DeliveryStatus::Failed));
    }

    #[test]
    fn test_direction_serde_tags() {
        let json = serde_json::to_string(&Direction::Inbound).unwrap();
        assert_eq!(json, "\"inbound\"");
        let back: Direction = serde_json::from_str("\"outbound\"").unwrap();
        assert_eq!(back, Direction::Outbound);
    }
}
