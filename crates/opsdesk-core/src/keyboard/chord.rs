//! Chord recognition over raw key events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Navigation intent produced by a recognized chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordAction {
    /// Close the active tab.
    CloseTab,
    /// Close every tab.
    CloseAll,
    /// Activate the next tab, wrapping around the strip.
    NextTab,
    /// Activate the previous tab, wrapping around the strip.
    PrevTab,
}

/// Where the input focus currently is.
///
/// Chords are suppressed only while focus is inside a text-entry element,
/// so normal typing is never hijacked; anywhere else they fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// Focus is inside a text-entry element (message composer, search box).
    TextEntry,
    /// Focus is anywhere else.
    Elsewhere,
}

/// Returns the platform-conventional "close" modifier: Command on macOS,
/// Control elsewhere.
pub fn close_modifier() -> KeyModifiers {
    if cfg!(target_os = "macos") {
        KeyModifiers::SUPER
    } else {
        KeyModifiers::CONTROL
    }
}

/// Maps a raw key event to a chord action, if it matches one.
///
/// Recognized chords:
///
/// | Chord | Action |
/// |---|---|
/// | close modifier + `w` | [`ChordAction::CloseTab`] |
/// | close modifier + shift + `w` | [`ChordAction::CloseAll`] |
/// | ctrl + Tab | [`ChordAction::NextTab`] |
/// | ctrl + shift + Tab | [`ChordAction::PrevTab`] |
///
/// Preconditions (open-tab counts, focus) are checked by the dispatcher,
/// not here.
pub fn chord_action(event: &KeyEvent) -> Option<ChordAction> {
    match event.code {
        // Shifted 'w' may arrive as an uppercase char with or without the
        // SHIFT bit, depending on the terminal.
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'w') => {
            if !event.modifiers.contains(close_modifier()) {
                return None;
            }
            let shifted =
                event.modifiers.contains(KeyModifiers::SHIFT) || c.is_ascii_uppercase();
            Some(if shifted {
                ChordAction::CloseAll
            } else {
                ChordAction::CloseTab
            })
        }
        KeyCode::Tab if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(if event.modifiers.contains(KeyModifiers::SHIFT) {
                ChordAction::PrevTab
            } else {
                ChordAction::NextTab
            })
        }
        // Terminals commonly report shift+Tab as BackTab.
        KeyCode::BackTab if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ChordAction::PrevTab)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_close_tab_chord() {
        let event = key(KeyCode::Char('w'), close_modifier());
        assert_eq!(chord_action(&event), Some(ChordAction::CloseTab));
    }

    #[test]
    fn test_close_all_chord_with_shift_bit() {
        let event = key(KeyCode::Char('w'), close_modifier() | KeyModifiers::SHIFT);
        assert_eq!(chord_action(&event), Some(ChordAction::CloseAll));
    }

    #[test]
    fn test_close_all_chord_with_uppercase_char() {
        let event = key(KeyCode::Char('W'), close_modifier());
        assert_eq!(chord_action(&event), Some(ChordAction::CloseAll));
    }

    #[test]
    fn test_next_and_prev_tab_chords() {
        let next = key(KeyCode::Tab, KeyModifiers::CONTROL);
        assert_eq!(chord_action(&next), Some(ChordAction::NextTab));

        let prev = key(KeyCode::Tab, KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(chord_action(&prev), Some(ChordAction::PrevTab));

        let back_tab = key(KeyCode::BackTab, KeyModifiers::CONTROL);
        assert_eq!(chord_action(&back_tab), Some(ChordAction::PrevTab));
    }

    #[test]
    fn test_unmodified_keys_are_not_chords() {
        assert_eq!(chord_action(&key(KeyCode::Char('w'), KeyModifiers::NONE)), None);
        assert_eq!(chord_action(&key(KeyCode::Tab, KeyModifiers::NONE)), None);
        assert_eq!(chord_action(&key(KeyCode::Char('x'), close_modifier())), None);
    }
}
