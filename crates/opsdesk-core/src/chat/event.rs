use serde::{Deserialize, Serialize};

/// Change notifications published by the open-chat manager.
///
/// Every mutating operation on the manager emits one or more of these so
/// that presentation state can re-render from a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatSessionEvent {
    /// A new tab was appended to the strip.
    Opened { conversation_id: String },
    /// A tab was removed from the strip.
    Closed { conversation_id: String },
    /// The active selection moved (or cleared).
    ActiveChanged { conversation_id: Option<String> },
    /// The message list of an open tab was replaced.
    MessagesUpdated { conversation_id: String },
    /// All tabs were removed at once.
    ClosedAll,
}
