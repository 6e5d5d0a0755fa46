//! In-memory fixture inbox data source.
//!
//! Serves seeded conversations for development and tests, with the same
//! observable behavior as the live service: fetching marks a conversation
//! read, sending appends a delivered message and refreshes the preview,
//! quick actions mutate the conversation record.

use async_trait::async_trait;
use tokio::sync::RwLock;

use opsdesk_core::conversation::{
    Attachment, ContentType, Conversation, ConversationFilter, DeliveryStatus, Direction,
    Message, Platform,
};
use opsdesk_core::error::{OpsdeskError, Result};
use opsdesk_core::inbox::{ConversationDetail, ConversationPage, InboxDataSource};
use opsdesk_core::quick_action::{QuickAction, QuickActionOutcome};

/// One seeded conversation with its messages.
#[derive(Debug, Clone)]
struct FixtureThread {
    conversation: Conversation,
    messages: Vec<Message>,
}

/// In-memory `InboxDataSource` backed by seeded fixture data.
pub struct FixtureInboxRepository {
    threads: RwLock<Vec<FixtureThread>>,
}

impl FixtureInboxRepository {
    /// Creates an empty fixture repository.
    pub fn new() -> Self {
        Self {
            threads: RwLock::new(Vec::new()),
        }
    }

    /// Creates a fixture repository with the standard seed set: one
    /// conversation per platform, a couple of them unread.
    pub fn with_seed_data() -> Self {
        let repository = Self::new();
        {
            let mut threads = repository.threads.try_write().expect("fresh lock");
            *threads = seed_threads();
        }
        repository
    }

    /// Inserts a conversation with its messages (test setup hook).
    pub async fn insert_conversation(&self, conversation: Conversation, messages: Vec<Message>) {
        let mut threads = self.threads.write().await;
        threads.push(FixtureThread {
            conversation,
            messages,
        });
    }
}

impl Default for FixtureInboxRepository {
    fn default() -> Self {
        Self::with_seed_data()
    }
}

#[async_trait]
impl InboxDataSource for FixtureInboxRepository {
    async fn list_conversations(&self, filter: &ConversationFilter) -> Result<ConversationPage> {
        let threads = self.threads.read().await;

        let mut conversations: Vec<Conversation> = threads
            .iter()
            .map(|t| t.conversation.clone())
            .filter(|c| filter.matches(c))
            .collect();
        // Most recent activity first; conversations without activity sink.
        conversations.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));

        let unread_total = threads
            .iter()
            .filter(|t| !t.conversation.is_archived)
            .map(|t| t.conversation.unread_count)
            .sum();

        Ok(ConversationPage {
            total: conversations.len(),
            unread_total,
            conversations,
        })
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationDetail> {
        let mut threads = self.threads.write().await;
        let thread = threads
            .iter_mut()
            .find(|t| t.conversation.id == conversation_id)
            .ok_or_else(|| OpsdeskError::not_found("conversation", conversation_id))?;

        // Fetching a conversation is reading it.
        thread.conversation.unread_count = 0;

        Ok(ConversationDetail {
            conversation: thread.conversation.clone(),
            messages: thread.messages.clone(),
        })
    }

    async fn send_message(
        &self,
        conversation_id: &str,
        content: &str,
        attachments: Vec<Attachment>,
    ) -> Result<Message> {
        let mut threads = self.threads.write().await;
        let thread = threads
            .iter_mut()
            .find(|t| t.conversation.id == conversation_id)
            .ok_or_else(|| OpsdeskError::not_found("conversation", conversation_id))?;

        let mut message = Message::outbound_text(conversation_id, content);
        if !attachments.is_empty() {
            message.content_type = ContentType::File;
            message.attachments = attachments;
        }
        message.advance_status(DeliveryStatus::Sent);

        thread.conversation.last_message_preview = Some(preview_of(content));
        thread.conversation.last_message_at = Some(message.created_at.clone());
        thread.messages.push(message.clone());

        tracing::debug!(conversation_id, "fixture delivered outbound message");
        Ok(message)
    }

    async fn quick_action(
        &self,
        conversation_id: &str,
        action: QuickAction,
        _data: Option<serde_json::Value>,
    ) -> Result<QuickActionOutcome> {
        let mut threads = self.threads.write().await;
        let thread = threads
            .iter_mut()
            .find(|t| t.conversation.id == conversation_id)
            .ok_or_else(|| OpsdeskError::not_found("conversation", conversation_id))?;

        let outcome = match action {
            QuickAction::CreateClient => {
                let client_id = uuid::Uuid::new_v4().to_string();
                thread.conversation.client_id = Some(client_id.clone());
                QuickActionOutcome {
                    action,
                    entity_id: Some(client_id),
                    detail: Some(format!(
                        "client created from {}",
                        thread.conversation.title()
                    )),
                }
            }
            QuickAction::CreateOrder => QuickActionOutcome {
                action,
                entity_id: Some(uuid::Uuid::new_v4().to_string()),
                detail: Some("order draft created".to_string()),
            },
            QuickAction::ArchiveConversation => {
                thread.conversation.is_archived = true;
                QuickActionOutcome {
                    action,
                    entity_id: None,
                    detail: Some("conversation archived".to_string()),
                }
            }
        };

        tracing::debug!(conversation_id, %action, "fixture quick action applied");
        Ok(outcome)
    }
}

fn preview_of(content: &str) -> String {
    const PREVIEW_CHARS: usize = 80;
    let line = content.lines().next().unwrap_or_default();
    line.chars().take(PREVIEW_CHARS).collect()
}

fn seed_threads() -> Vec<FixtureThread> {
    let mut threads = Vec::new();

    threads.push(thread(
        "conv-telegram-anna",
        Platform::Telegram,
        "@anna_k",
        Some("Anna Kowalska"),
        2,
        &[
            (Direction::Inbound, "Hi! Is the Saturday 10:00 slot still free?"),
            (Direction::Outbound, "Yes, 10:00 works. Shall I book it?"),
            (Direction::Inbound, "Please do. Can I also move my order pickup?"),
        ],
    ));

    threads.push(thread(
        "conv-whatsapp-marco",
        Platform::Whatsapp,
        "+39 333 111 2222",
        Some("Marco Rossi"),
        1,
        &[
            (Direction::Inbound, "Buongiorno, did the invoice go out?"),
        ],
    ));

    threads.push(thread(
        "conv-email-lena",
        Platform::Email,
        "lena@example.com",
        Some("Lena Fischer"),
        0,
        &[
            (Direction::Inbound, "Quote request for **20 units**, see https://example.com/rfq/118"),
            (Direction::Outbound, "Thanks Lena, quote attached. Valid until Friday."),
        ],
    ));

    threads.push(thread(
        "conv-facebook-shop",
        Platform::Facebook,
        "fb:shopper.542",
        None,
        0,
        &[(Direction::Inbound, "Do you ship to Austria?")],
    ));

    threads.push(thread(
        "conv-instagram-mia",
        Platform::Instagram,
        "@mia.styles",
        Some("Mia"),
        0,
        &[(Direction::Inbound, "Loved the new collection #restock please!")],
    ));

    // One archived thread so the archived segment is not empty.
    let mut archived = thread(
        "conv-email-old",
        Platform::Email,
        "former.client@example.com",
        Some("Former Client"),
        0,
        &[(Direction::Inbound, "Closing our account, thanks for everything.")],
    );
    archived.conversation.is_archived = true;
    threads.push(archived);

    threads
}

fn thread(
    id: &str,
    platform: Platform,
    address: &str,
    display_name: Option<&str>,
    unread: u32,
    script: &[(Direction, &str)],
) -> FixtureThread {
    let mut messages = Vec::new();
    let base = chrono::Utc::now() - chrono::Duration::hours(script.len() as i64);

    for (offset, (direction, content)) in script.iter().enumerate() {
        let created_at = (base + chrono::Duration::hours(offset as i64)).to_rfc3339();
        messages.push(Message {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: id.to_string(),
            direction: *direction,
            content_type: ContentType::Text,
            content: content.to_string(),
            status: match direction {
                Direction::Inbound => DeliveryStatus::Read,
                Direction::Outbound => DeliveryStatus::Sent,
            },
            attachments: Vec::new(),
            created_at: created_at.clone(),
            sent_at: match direction {
                Direction::Outbound => Some(created_at),
                Direction::Inbound => None,
            },
        });
    }

    let conversation = Conversation {
        id: id.to_string(),
        platform,
        address: address.to_string(),
        subject: None,
        client_id: None,
        display_name: display_name.map(str::to_string),
        avatar_url: None,
        unread_count: unread,
        last_message_preview: messages.last().map(|m| preview_of(&m.content)),
        last_message_at: messages.last().map(|m| m.created_at.clone()),
        is_archived: false,
    };

    FixtureThread {
        conversation,
        messages,
    }
}
