//! Keyboard shortcuts for history actions.
//!
//! Maps key + modifier combos to semantic `HistoryAction`s. The map lives
//! in Rust so every front end resolves undo/redo the same way:
//! - ⌘Z = undo
//! - ⇧⌘Z or ⌘Y = redo
//! - ⌘S = save

/// Actions a history shortcut can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Undo,
    Redo,
    Save,
}

/// Resolves key events into history actions.
///
/// Platform-aware: on macOS `meta` is ⌘, on other platforms `ctrl` serves
/// the same role.
pub struct HistoryShortcut;

impl HistoryShortcut {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Z"`).
    /// Returns `None` if the combo has no history binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<HistoryAction> {
        let cmd = ctrl || meta;
        if !cmd || alt {
            return None;
        }

        if shift {
            return match key {
                "z" | "Z" => Some(HistoryAction::Redo),
                _ => None,
            };
        }

        match key {
            "z" | "Z" => Some(HistoryAction::Undo),
            "y" | "Y" => Some(HistoryAction::Redo),
            "s" | "S" => Some(HistoryAction::Save),
            _ => None,
        }
    }
}
