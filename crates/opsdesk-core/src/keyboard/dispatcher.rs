//! Precondition checks, intent dispatch and listener lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::KeyEvent;

use super::chord::{ChordAction, FocusTarget, chord_action};
use crate::chat::OpenChatManager;
use crate::error::{OpsdeskError, Result};

static LISTENER_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Guard for the process-wide keyboard listener.
///
/// A mounted view installs the listener once and releases it on teardown;
/// the guard enforces that discipline by refusing a second installation
/// while one is live and deregistering on drop.
#[derive(Debug)]
pub struct ShortcutListener {
    _private: (),
}

impl ShortcutListener {
    /// Acquires the process-wide listener slot.
    ///
    /// # Errors
    ///
    /// Returns an error if a listener is already installed.
    pub fn install() -> Result<Self> {
        if LISTENER_INSTALLED.swap(true, Ordering::SeqCst) {
            return Err(OpsdeskError::internal(
                "keyboard shortcut listener already installed",
            ));
        }
        tracing::debug!("keyboard shortcut listener installed");
        Ok(Self { _private: () })
    }
}

impl Drop for ShortcutListener {
    fn drop(&mut self) {
        LISTENER_INSTALLED.store(false, Ordering::SeqCst);
        tracing::debug!("keyboard shortcut listener released");
    }
}

/// Translates key chords into open-chat manager calls.
///
/// The dispatcher never mutates session state directly beyond invoking the
/// manager's own operations, and it never consumes an event it does not
/// act on - unmatched keys and chords whose precondition fails fall
/// through to whatever else is listening.
pub struct ShortcutDispatcher;

impl ShortcutDispatcher {
    /// Resolves a key event to an actionable chord.
    ///
    /// Returns `None` (event not consumed) when:
    /// - focus is inside a text-entry element
    /// - the key is not a recognized chord
    /// - the chord's precondition fails: close chords need at least one
    ///   open tab, navigation chords need more than one
    pub fn resolve(
        event: &KeyEvent,
        focus: FocusTarget,
        tab_count: usize,
    ) -> Option<ChordAction> {
        if focus == FocusTarget::TextEntry {
            return None;
        }
        let action = chord_action(event)?;
        let required_tabs = match action {
            ChordAction::CloseTab | ChordAction::CloseAll => 1,
            ChordAction::NextTab | ChordAction::PrevTab => 2,
        };
        (tab_count >= required_tabs).then_some(action)
    }

    /// Resolves a key event and applies the resulting intent to `manager`.
    ///
    /// # Returns
    ///
    /// The action that was applied, or `None` when the event was not
    /// consumed.
    pub fn dispatch(
        event: &KeyEvent,
        focus: FocusTarget,
        manager: &mut OpenChatManager,
    ) -> Option<ChordAction> {
        let action = Self::resolve(event, focus, manager.tab_count())?;
        match action {
            ChordAction::CloseTab => {
                if let Some(active) = manager.active_id().map(str::to_owned) {
                    manager.close_chat(&active);
                }
            }
            ChordAction::CloseAll => manager.close_all(),
            ChordAction::NextTab => {
                if let Some(target) = manager.cycle_target(1).map(str::to_owned) {
                    manager.switch_to_chat(&target);
                }
            }
            ChordAction::PrevTab => {
                if let Some(target) = manager.cycle_target(-1).map(str::to_owned) {
                    manager.switch_to_chat(&target);
                }
            }
        }
        tracing::trace!(?action, "keyboard chord dispatched");
        Some(action)
    }
}
