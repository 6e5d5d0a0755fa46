//! Open tab record and presentation snapshots.

use serde::{Deserialize, Serialize};

use crate::conversation::{Conversation, Message, Platform};

/// A conversation currently open as a tab, together with its loaded
/// message list.
///
/// An `OpenChat` exists only while the tab is open and is owned exclusively
/// by the [`OpenChatManager`](super::OpenChatManager); presentation code
/// reads snapshots instead of holding references into it. Closing the tab
/// destroys the record, and re-opening the conversation later starts from a
/// freshly supplied message list.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenChat {
    /// The conversation shown in this tab
    pub conversation: Conversation,
    /// Messages loaded for this tab, ordered by creation time
    pub messages: Vec<Message>,
}

impl OpenChat {
    /// Creates a new open tab for `conversation` with its fetched messages.
    pub fn new(conversation: Conversation, messages: Vec<Message>) -> Self {
        Self {
            conversation,
            messages,
        }
    }

    /// Returns a lightweight summary for tab strips.
    pub fn summary(&self) -> OpenChatSummary {
        OpenChatSummary {
            conversation_id: self.conversation.id.clone(),
            title: self.conversation.title().to_string(),
            platform: self.conversation.platform,
            unread_count: self.conversation.unread_count,
            message_count: self.messages.len(),
        }
    }
}

/// Immutable per-tab summary handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenChatSummary {
    pub conversation_id: String,
    pub title: String,
    pub platform: Platform,
    pub unread_count: u32,
    pub message_count: usize,
}

/// Immutable view of the whole tab strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSessionSnapshot {
    /// Tab summaries in tab order
    pub tabs: Vec<OpenChatSummary>,
    /// Identifier of the active tab, if any
    pub active_id: Option<String>,
}

impl ChatSessionSnapshot {
    /// Returns the position of the active tab within `tabs`.
    pub fn active_index(&self) -> Option<usize> {
        let active_id = self.active_id.as_deref()?;
        self.tabs
            .iter()
            .position(|tab| tab.conversation_id == active_id)
    }
}
