//! Inbox data-source module.
//!
//! Defines the seam between the in-memory chat session and whatever
//! supplies conversation data: an in-memory fixture during development and
//! tests, or a remote inbox service in production. The implementation is
//! chosen at composition time.

mod repository;

// Re-export public API
pub use repository::{ConversationDetail, ConversationPage, InboxDataSource};

use crate::chat::OpenChatManager;
use crate::conversation::{Attachment, Message};
use crate::error::Result;

/// Sends a message and merges the delivered copy into the open tab.
///
/// The data-source call is the only suspension point; the merge itself is
/// a synchronous last-write-wins replacement through
/// [`OpenChatManager::update_chat_messages`], so a tab that was closed
/// while the send was in flight is simply left alone.
///
/// # Errors
///
/// Propagates the data source's send failure untouched; the caller decides
/// how to surface it.
pub async fn send_into_open_chat(
    source: &dyn InboxDataSource,
    manager: &mut OpenChatManager,
    conversation_id: &str,
    content: &str,
    attachments: Vec<Attachment>,
) -> Result<Message> {
    let message = source
        .send_message(conversation_id, content, attachments)
        .await?;

    if let Some(position) = manager.position(conversation_id) {
        let mut messages = manager.chats()[position].messages.clone();
        messages.push(message.clone());
        manager.update_chat_messages(conversation_id, messages);
    }

    Ok(message)
}
