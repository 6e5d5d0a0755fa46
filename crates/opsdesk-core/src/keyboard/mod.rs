//! Keyboard shortcut module.
//!
//! Translates a fixed set of key chords into open-chat navigation intents,
//! scoped to when no text-entry element holds focus.
//!
//! # Module Structure
//!
//! - `chord`: Chord recognition over raw key events
//! - `dispatcher`: Precondition checks, intent dispatch and the
//!   install/release guard for the process-wide listener

mod chord;
mod dispatcher;

// Re-export public API
pub use chord::{ChordAction, FocusTarget, chord_action, close_modifier};
pub use dispatcher::{ShortcutDispatcher, ShortcutListener};
