use tokio::sync::broadcast;

use super::event::ChatSessionEvent;
use super::open_chat::{ChatSessionSnapshot, OpenChat};
use crate::conversation::{Conversation, Message};

/// Capacity of the change-notification channel. Slow subscribers that fall
/// further behind than this miss events and must re-read a snapshot.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Manages the ordered set of open conversation tabs and the active
/// selection.
///
/// `OpenChatManager` is responsible for:
/// - Opening conversations as tabs (idempotent per conversation id)
/// - Closing tabs and choosing the replacement selection
/// - Switching the active tab
/// - Replacing a tab's loaded message list
/// - Publishing a change notification on every mutation
///
/// All operations are synchronous and touch only in-memory state; fetching
/// conversation data is the caller's responsibility. The manager is the
/// single writer of this state - presentation code and the keyboard
/// dispatcher read snapshots and dispatch intents back into it.
///
/// Tab order is insertion order. The active id, when set, always refers to
/// a tab present in the strip, and no conversation id appears twice.
pub struct OpenChatManager {
    /// Open tabs in tab order
    chats: Vec<OpenChat>,
    /// Identifier of the active tab
    active_id: Option<String>,
    /// Change-notification channel
    events: broadcast::Sender<ChatSessionEvent>,
}

impl Default for OpenChatManager {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenChatManager {
    /// Creates a new manager with no open tabs.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            chats: Vec::new(),
            active_id: None,
            events,
        }
    }

    /// Subscribes to change notifications.
    ///
    /// Every mutating operation publishes one or more
    /// [`ChatSessionEvent`]s. Receivers that lag too far behind miss
    /// events; re-reading [`snapshot`](Self::snapshot) recovers the full
    /// state.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatSessionEvent> {
        self.events.subscribe()
    }

    /// Opens a conversation as a tab and makes it active.
    ///
    /// If a tab for `conversation.id` already exists, no tab is created;
    /// the existing tab's message list is replaced with `initial_messages`
    /// (last write wins) and the tab is marked active. Otherwise a new tab
    /// is appended to the end of the strip.
    ///
    /// The unread counter of the tab copy is cleared; opening a chat means
    /// looking at it.
    ///
    /// # Arguments
    ///
    /// * `conversation` - The fully resolved conversation to open
    /// * `initial_messages` - Its message list, already fetched by the caller
    pub fn open_chat(&mut self, mut conversation: Conversation, initial_messages: Vec<Message>) {
        let id = conversation.id.clone();
        conversation.unread_count = 0;

        if let Some(chat) = self.chats.iter_mut().find(|c| c.conversation.id == id) {
            chat.conversation = conversation;
            chat.messages = initial_messages;
            self.emit(ChatSessionEvent::MessagesUpdated {
                conversation_id: id.clone(),
            });
        } else {
            self.chats.push(OpenChat::new(conversation, initial_messages));
            self.emit(ChatSessionEvent::Opened {
                conversation_id: id.clone(),
            });
        }

        self.set_active(Some(id));
    }

    /// Closes the tab for `conversation_id`, if it is open.
    ///
    /// Closing an id that is not open is a no-op. When the closed tab was
    /// active, the replacement is the tab immediately to its left in tab
    /// order, else the new leftmost tab, else none when the strip becomes
    /// empty.
    pub fn close_chat(&mut self, conversation_id: &str) {
        let Some(index) = self.position(conversation_id) else {
            return;
        };

        self.chats.remove(index);
        self.emit(ChatSessionEvent::Closed {
            conversation_id: conversation_id.to_string(),
        });

        if self.active_id.as_deref() == Some(conversation_id) {
            let replacement = if self.chats.is_empty() {
                None
            } else {
                // Prefer the left neighbor; fall back to the new leftmost.
                let neighbor = index.saturating_sub(1).min(self.chats.len() - 1);
                Some(self.chats[neighbor].conversation.id.clone())
            };
            self.set_active(replacement);
        }
    }

    /// Makes the tab for `conversation_id` active, if it is open.
    ///
    /// Switching to an id that is not open leaves the selection unchanged.
    pub fn switch_to_chat(&mut self, conversation_id: &str) {
        if self.position(conversation_id).is_some() {
            self.set_active(Some(conversation_id.to_string()));
        }
    }

    /// Replaces the message list of an open tab (last write wins).
    ///
    /// Used after a successful send or an incoming-message refresh. A tab
    /// that is not open is left unchanged.
    pub fn update_chat_messages(&mut self, conversation_id: &str, messages: Vec<Message>) {
        if let Some(chat) = self
            .chats
            .iter_mut()
            .find(|c| c.conversation.id == conversation_id)
        {
            chat.messages = messages;
            self.emit(ChatSessionEvent::MessagesUpdated {
                conversation_id: conversation_id.to_string(),
            });
        }
    }

    /// Closes every tab and clears the selection.
    pub fn close_all(&mut self) {
        if self.chats.is_empty() {
            return;
        }
        self.chats.clear();
        self.active_id = None;
        self.emit(ChatSessionEvent::ClosedAll);
    }

    /// Returns the active tab, or `None` when no tab is open.
    pub fn active_chat(&self) -> Option<&OpenChat> {
        let active_id = self.active_id.as_deref()?;
        self.chats.iter().find(|c| c.conversation.id == active_id)
    }

    /// Returns the identifier of the active tab.
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Returns the open tabs in tab order.
    pub fn chats(&self) -> &[OpenChat] {
        &self.chats
    }

    /// Returns the number of open tabs.
    pub fn tab_count(&self) -> usize {
        self.chats.len()
    }

    /// Returns true when no tab is open.
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Returns the tab-order position of `conversation_id`.
    pub fn position(&self, conversation_id: &str) -> Option<usize> {
        self.chats
            .iter()
            .position(|c| c.conversation.id == conversation_id)
    }

    /// Returns the id of the tab `offset` steps from the active one,
    /// wrapping around the strip.
    ///
    /// Returns `None` with fewer than two tabs open or no active tab, so
    /// cyclic navigation never degenerates into a self-switch.
    pub fn cycle_target(&self, offset: isize) -> Option<&str> {
        if self.chats.len() < 2 {
            return None;
        }
        let active_index = self.position(self.active_id.as_deref()?)? as isize;
        let count = self.chats.len() as isize;
        let target = (active_index + offset).rem_euclid(count) as usize;
        Some(&self.chats[target].conversation.id)
    }

    /// Returns an immutable view of the tab strip for presentation.
    pub fn snapshot(&self) -> ChatSessionSnapshot {
        ChatSessionSnapshot {
            tabs: self.chats.iter().map(OpenChat::summary).collect(),
            active_id: self.active_id.clone(),
        }
    }

    fn set_active(&mut self, conversation_id: Option<String>) {
        if self.active_id == conversation_id {
            return;
        }
        self.active_id = conversation_id.clone();
        self.emit(ChatSessionEvent::ActiveChanged { conversation_id });
    }

    fn emit(&self, event: ChatSessionEvent) {
        // Send fails only when no subscriber is attached.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Platform;

    fn conversation(id: &str) -> Conversation {
        Conversation {
            id: id.to_string(),
            platform: Platform::Telegram,
            address: format!("@{id}"),
            subject: None,
            client_id: None,
            display_name: Some(format!("Contact {id}")),
            avatar_url: None,
            unread_count: 3,
            last_message_preview: None,
            last_message_at: None,
            is_archived: false,
        }
    }

    fn open(manager: &mut OpenChatManager, id: &str) {
        manager.open_chat(conversation(id), Vec::new());
    }

    #[test]
    fn test_open_order_equals_call_order_and_last_is_active() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        open(&mut manager, "2");
        open(&mut manager, "3");

        let ids: Vec<&str> = manager
            .chats()
            .iter()
            .map(|c| c.conversation.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(manager.active_id(), Some("3"));
    }

    #[test]
    fn test_open_is_idempotent_per_id() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        open(&mut manager, "2");
        open(&mut manager, "1");

        assert_eq!(manager.tab_count(), 2);
        assert_eq!(manager.active_id(), Some("1"));
    }

    #[test]
    fn test_reopen_replaces_messages_last_write_wins() {
        let mut manager = OpenChatManager::new();
        let first = vec![Message::outbound_text("1", "stale fetch")];
        let second = vec![
            Message::outbound_text("1", "fresh fetch"),
            Message::outbound_text("1", "second line"),
        ];
        manager.open_chat(conversation("1"), first);
        manager.open_chat(conversation("1"), second);

        let chat = manager.active_chat().unwrap();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].content, "fresh fetch");
    }

    #[test]
    fn test_open_clears_unread_on_tab_copy() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        assert_eq!(manager.active_chat().unwrap().conversation.unread_count, 0);
    }

    #[test]
    fn test_close_active_prefers_left_neighbor() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        open(&mut manager, "2");
        open(&mut manager, "3");

        manager.close_chat("3");
        assert_eq!(manager.active_id(), Some("2"));
    }

    #[test]
    fn test_close_leftmost_active_selects_new_leftmost() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        open(&mut manager, "2");
        open(&mut manager, "3");
        manager.switch_to_chat("1");

        manager.close_chat("1");
        assert_eq!(manager.active_id(), Some("2"));
    }

    #[test]
    fn test_close_only_tab_clears_selection() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        manager.close_chat("1");

        assert!(manager.is_empty());
        assert_eq!(manager.active_id(), None);
        assert!(manager.active_chat().is_none());
    }

    #[test]
    fn test_close_inactive_keeps_selection() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        open(&mut manager, "2");

        manager.close_chat("1");
        assert_eq!(manager.active_id(), Some("2"));
    }

    #[test]
    fn test_close_absent_id_is_a_noop() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        manager.close_chat("ghost");

        assert_eq!(manager.tab_count(), 1);
        assert_eq!(manager.active_id(), Some("1"));
    }

    #[test]
    fn test_switch_to_absent_id_keeps_selection() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        manager.switch_to_chat("ghost");

        assert_eq!(manager.active_id(), Some("1"));
    }

    #[test]
    fn test_close_all_empties_strip() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        open(&mut manager, "2");

        manager.close_all();
        assert!(manager.is_empty());
        assert_eq!(manager.active_id(), None);
    }

    #[test]
    fn test_cycle_next_returns_after_full_loop() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        open(&mut manager, "2");
        open(&mut manager, "3");

        for _ in 0..3 {
            let target = manager.cycle_target(1).unwrap().to_string();
            manager.switch_to_chat(&target);
        }
        assert_eq!(manager.active_id(), Some("3"));
    }

    #[test]
    fn test_cycle_needs_two_tabs() {
        let mut manager = OpenChatManager::new();
        assert!(manager.cycle_target(1).is_none());
        open(&mut manager, "1");
        assert!(manager.cycle_target(1).is_none());
        open(&mut manager, "2");
        assert!(manager.cycle_target(1).is_some());
    }

    #[test]
    fn test_prev_twice_then_close_leftmost() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        open(&mut manager, "2");
        open(&mut manager, "3");

        for _ in 0..2 {
            let target = manager.cycle_target(-1).unwrap().to_string();
            manager.switch_to_chat(&target);
        }
        assert_eq!(manager.active_id(), Some("1"));

        manager.close_chat("1");
        assert_eq!(manager.active_id(), Some("2"));
    }

    #[test]
    fn test_update_messages_appends_sent_message() {
        let mut manager = OpenChatManager::new();
        manager.open_chat(conversation("1"), vec![Message::outbound_text("1", "hi")]);

        let mut messages = manager.active_chat().unwrap().messages.clone();
        messages.push(Message::outbound_text("1", "follow-up"));
        manager.update_chat_messages("1", messages);

        let chat = manager.active_chat().unwrap();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages.last().unwrap().content, "follow-up");
    }

    #[test]
    fn test_update_messages_for_closed_tab_is_a_noop() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        manager.update_chat_messages("ghost", vec![Message::outbound_text("ghost", "x")]);

        assert_eq!(manager.tab_count(), 1);
        assert!(manager.active_chat().unwrap().messages.is_empty());
    }

    #[test]
    fn test_reopen_after_close_is_a_fresh_tab() {
        let mut manager = OpenChatManager::new();
        manager.open_chat(conversation("1"), vec![Message::outbound_text("1", "old")]);
        manager.close_chat("1");

        open(&mut manager, "1");
        assert!(manager.active_chat().unwrap().messages.is_empty());
    }

    #[test]
    fn test_snapshot_reflects_strip_and_selection() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");
        open(&mut manager, "2");
        manager.switch_to_chat("1");

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.tabs.len(), 2);
        assert_eq!(snapshot.active_id.as_deref(), Some("1"));
        assert_eq!(snapshot.active_index(), Some(0));
        assert_eq!(snapshot.tabs[1].title, "Contact 2");
    }

    #[test]
    fn test_events_are_published_on_mutation() {
        let mut manager = OpenChatManager::new();
        let mut events = manager.subscribe();

        open(&mut manager, "1");
        assert_eq!(
            events.try_recv().unwrap(),
            ChatSessionEvent::Opened {
                conversation_id: "1".to_string()
            }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            ChatSessionEvent::ActiveChanged {
                conversation_id: Some("1".to_string())
            }
        );

        manager.close_chat("1");
        assert_eq!(
            events.try_recv().unwrap(),
            ChatSessionEvent::Closed {
                conversation_id: "1".to_string()
            }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            ChatSessionEvent::ActiveChanged {
                conversation_id: None
            }
        );
    }

    #[test]
    fn test_no_event_when_nothing_changes() {
        let mut manager = OpenChatManager::new();
        open(&mut manager, "1");

        let mut events = manager.subscribe();
        manager.close_chat("ghost");
        manager.switch_to_chat("ghost");
        manager.switch_to_chat("1"); // already active
        assert!(events.try_recv().is_err());
    }
}
