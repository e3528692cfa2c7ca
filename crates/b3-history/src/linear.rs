//! Bounded, cursor-based undo history.
//!
//! Commands live in a doubly linked list; the cursor points at the most
//! recently applied command (`None` = before the first one). Adding a
//! command destroys everything ahead of the cursor, so history is linear,
//! never a tree.
//!
//! ```text
//!  head                 cursor
//!   │                     │
//!   ▼                     ▼
//! [cmd1] ⇄ [cmd2] ⇄ [cmd3] ⇄ [cmd4]      applied = 3, len = 4
//!                            └─ redo target
//! ```
//!
//! # Save tracking
//!
//! When a bound is set, the oldest command is evicted once the list grows
//! past it. Positions are therefore tracked in absolute terms: the
//! absolute position of the cursor is `applied + num_removed`, and `save()`
//! records that number. The history is saved when the cursor returns to
//! the recorded position, or when every command between the two is one
//! whose [`Command::modifies_save_data`] is `false`.

use crate::command::Command;
use crate::error::{HistoryError, Result, check_max_length};
use crate::node::{NodeList, NodeRef};

#[derive(Debug)]
pub struct LinearHistory {
    nodes: NodeList<Box<dyn Command>>,
    /// Most recently applied command; `None` before the first one.
    cursor: Option<NodeRef>,
    /// Commands at or before the cursor.
    applied: usize,
    max_length: Option<usize>,
    /// Absolute position recorded by the last `save()`. `None` after
    /// `mark_unsaved()`.
    save_mark: Option<usize>,
    /// Commands evicted from the head so far.
    num_removed: usize,
}

impl Default for LinearHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearHistory {
    /// An unbounded, empty history. Empty histories count as saved.
    pub fn new() -> Self {
        Self {
            nodes: NodeList::new(),
            cursor: None,
            applied: 0,
            max_length: None,
            save_mark: Some(0),
            num_removed: 0,
        }
    }

    /// # Errors
    /// `HistoryError::InvalidMaxLength` when `max_length` is zero.
    pub fn with_max_length(max_length: usize) -> Result<Self> {
        Self::bounded(Some(max_length))
    }

    /// Like [`with_max_length`](Self::with_max_length), `None` meaning unbounded.
    pub fn bounded(max_length: Option<usize>) -> Result<Self> {
        Ok(Self::with_checked_bound(check_max_length(max_length)?))
    }

    pub(crate) fn with_checked_bound(max_length: Option<usize>) -> Self {
        Self {
            max_length,
            ..Self::new()
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Zero-based index of the cursor among retained commands.
    pub fn cursor_pos(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn num_removed(&self) -> usize {
        self.num_removed
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.nodes.after(self.cursor).is_some()
    }

    /// Label of the command the next undo would revert.
    pub fn undo_description(&self) -> Option<&str> {
        let cmd = self.nodes.data(self.cursor?)?;
        Some(cmd.description())
    }

    /// Label of the command the next redo would re-apply.
    pub fn redo_description(&self) -> Option<&str> {
        let cmd = self.nodes.data(self.nodes.after(self.cursor)?)?;
        Some(cmd.description())
    }

    /// Whether the command at the cursor is a joint-action placeholder.
    pub fn has_chain_command(&self) -> bool {
        self.cursor
            .and_then(|at| self.nodes.data(at))
            .is_some_and(|cmd| cmd.is_chain())
    }

    /// Change the bound. Only allowed while the history is empty.
    ///
    /// # Errors
    /// `LiveResize` if commands are held, `InvalidMaxLength` for zero.
    pub fn set_max_length(&mut self, max_length: Option<usize>) -> Result<()> {
        if !self.is_empty() {
            return Err(HistoryError::LiveResize(self.len()));
        }
        self.max_length = check_max_length(max_length)?;
        Ok(())
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    /// Run `cmd` and record it after the cursor, dropping any redo branch.
    pub fn add_command(&mut self, mut cmd: Box<dyn Command>) {
        let was_saved = self.is_saved();
        cmd.run();
        log::trace!("run `{}`", cmd.description());

        self.discard_redo(was_saved);
        self.cursor = Some(self.nodes.push_back(cmd));
        self.applied += 1;

        if let Some(max) = self.max_length {
            while self.nodes.len() > max && self.evict_oldest() {}
        }
    }

    /// Undo the command at the cursor. Returns `false` when there is
    /// nothing left to undo.
    pub fn undo_last_command(&mut self) -> bool {
        let Some(at) = self.cursor else {
            return false;
        };
        let prev = self.nodes.prev(at);
        let Some(cmd) = self.nodes.data_mut(at) else {
            return false;
        };
        cmd.undo();
        log::trace!("undo `{}`", cmd.description());

        self.cursor = prev;
        self.applied -= 1;
        true
    }

    /// Redo the command after the cursor. Returns `false` when there is
    /// nothing left to redo.
    pub fn redo_next_command(&mut self) -> bool {
        let Some(target) = self.nodes.after(self.cursor) else {
            return false;
        };
        let Some(cmd) = self.nodes.data_mut(target) else {
            return false;
        };
        cmd.redo();
        log::trace!("redo `{}`", cmd.description());

        self.cursor = Some(target);
        self.applied += 1;
        true
    }

    /// Drop every command ahead of the cursor.
    pub fn clear_redo(&mut self) {
        let was_saved = self.is_saved();
        self.discard_redo(was_saved);
    }

    /// Forget all commands. The bound is kept; the history stays saved only
    /// if it was saved at the cursor.
    pub fn clear(&mut self) {
        let was_saved = self.is_saved();
        self.nodes = NodeList::new();
        self.cursor = None;
        self.applied = 0;
        self.num_removed = 0;
        self.save_mark = was_saved.then_some(0);
    }

    // ─── Save tracking ───────────────────────────────────────────────────

    pub fn save(&mut self) {
        self.save_mark = Some(self.absolute_position());
    }

    /// Forget the save point so the history reports unsaved until the next
    /// `save()`. Used for documents that were never written out.
    pub fn mark_unsaved(&mut self) {
        self.save_mark = None;
    }

    pub fn is_saved(&self) -> bool {
        let Some(mark) = self.save_mark else {
            return false;
        };
        let here = self.absolute_position();
        if mark == here {
            return true;
        }

        let (lo, hi) = (mark.min(here), mark.max(here));
        if lo < self.num_removed || hi - self.num_removed > self.nodes.len() {
            return false;
        }
        self.nodes
            .iter()
            .skip(lo - self.num_removed)
            .take(hi - lo)
            .all(|cmd| !cmd.modifies_save_data())
    }

    fn absolute_position(&self) -> usize {
        self.applied + self.num_removed
    }

    /// A mark on the dropped branch stays as recorded: it still names an
    /// absolute position, which a later command may reach again.
    fn discard_redo(&mut self, was_saved: bool) {
        if self.nodes.truncate_after(self.cursor).is_empty() {
            return;
        }
        if was_saved {
            self.save_mark = Some(self.absolute_position());
        }
    }

    fn evict_oldest(&mut self) -> bool {
        if self.nodes.head() == self.cursor {
            return false;
        }
        let Some(cmd) = self.nodes.pop_front() else {
            return false;
        };
        debug_assert!(self.applied > 0, "evicted a command ahead of the cursor");
        self.applied -= 1;
        self.num_removed += 1;
        log::debug!(
            "evicted `{}` ({} removed so far)",
            cmd.description(),
            self.num_removed
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ChainCommand, ClosureCommand};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn add(counter: &Rc<Cell<i64>>, delta: i64) -> Box<dyn Command> {
        let (up, down) = (counter.clone(), counter.clone());
        Box::new(ClosureCommand::new(
            format!("add {delta}"),
            move || up.set(up.get() + delta),
            move || down.set(down.get() - delta),
        ))
    }

    #[test]
    fn add_runs_immediately() {
        let value = Rc::new(Cell::new(0));
        let mut history = LinearHistory::new();
        history.add_command(add(&value, 5));
        assert_eq!(value.get(), 5);
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor_pos(), Some(0));
    }

    #[test]
    fn undo_redo_at_boundaries_are_noops() {
        let value = Rc::new(Cell::new(0));
        let mut history = LinearHistory::new();
        assert!(!history.undo_last_command());
        assert!(!history.redo_next_command());

        history.add_command(add(&value, 1));
        assert!(!history.redo_next_command());
        assert!(history.undo_last_command());
        assert!(!history.undo_last_command());
        assert_eq!(history.cursor_pos(), None);
        assert_eq!(value.get(), 0);
    }

    #[test]
    fn add_discards_redo_branch() {
        let value = Rc::new(Cell::new(0));
        let mut history = LinearHistory::new();
        history.add_command(add(&value, 1));
        history.add_command(add(&value, 2));
        history.undo_last_command();
        history.undo_last_command();

        history.add_command(add(&value, 10));
        assert_eq!(history.len(), 1);
        assert!(!history.can_redo());
        assert_eq!(value.get(), 10);
    }

    #[test]
    fn eviction_keeps_length_at_bound() {
        let value = Rc::new(Cell::new(0));
        let mut history = LinearHistory::with_max_length(3).unwrap();
        for i in 1..=5 {
            history.add_command(add(&value, i));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.num_removed(), 2);
        assert_eq!(history.cursor_pos(), Some(2));

        let mut undone = 0;
        while history.undo_last_command() {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(value.get(), 1 + 2);
    }

    #[test]
    fn save_point_survives_eviction() {
        let value = Rc::new(Cell::new(0));
        let mut history = LinearHistory::with_max_length(2).unwrap();
        history.add_command(add(&value, 1));
        history.add_command(add(&value, 2));
        history.save();
        history.add_command(add(&value, 3));
        assert!(!history.is_saved());
        assert_eq!(history.num_removed(), 1);

        history.undo_last_command();
        assert!(history.is_saved());
    }

    #[test]
    fn evicted_save_point_is_unreachable() {
        let value = Rc::new(Cell::new(0));
        let mut history = LinearHistory::with_max_length(1).unwrap();
        history.add_command(add(&value, 1));
        history.add_command(add(&value, 2));
        while history.undo_last_command() {}
        assert!(!history.is_saved());
    }

    #[test]
    fn save_mark_outlives_dropped_branch() {
        let value = Rc::new(Cell::new(0));
        let mut history = LinearHistory::new();
        history.add_command(add(&value, 1));
        history.save();
        history.undo_last_command();
        assert!(!history.is_saved());

        history.add_command(add(&value, 2));
        assert_eq!(history.cursor_pos(), Some(0));
        assert_eq!(history.num_removed(), 0);
        assert!(history.is_saved(), "cursor is back at the saved position");

        history.add_command(add(&value, 3));
        assert!(!history.is_saved());
        history.undo_last_command();
        assert!(history.is_saved());
    }

    #[test]
    fn view_only_commands_keep_history_saved() {
        let mut history = LinearHistory::new();
        let cmd = ClosureCommand::builder()
            .description("collapse")
            .run(|| {})
            .undo(|| {})
            .modifies_save_data(false)
            .build()
            .unwrap();
        history.add_command(Box::new(cmd));
        assert!(history.is_saved());
    }

    #[test]
    fn chain_at_cursor() {
        let mut history = LinearHistory::new();
        assert!(!history.has_chain_command());
        history.add_command(Box::new(ChainCommand));
        assert!(history.has_chain_command());
        history.undo_last_command();
        assert!(!history.has_chain_command());
    }

    #[test]
    fn zero_bound_is_rejected() {
        assert_eq!(
            LinearHistory::with_max_length(0).unwrap_err(),
            HistoryError::InvalidMaxLength(0)
        );
    }

    #[test]
    fn resizing_live_history_is_rejected() {
        let value = Rc::new(Cell::new(0));
        let mut history = LinearHistory::new();
        history.set_max_length(Some(4)).unwrap();
        history.add_command(add(&value, 1));
        assert_eq!(
            history.set_max_length(Some(8)),
            Err(HistoryError::LiveResize(1))
        );
        assert_eq!(history.max_length(), Some(4));
    }

    #[test]
    fn descriptions_follow_cursor() {
        let value = Rc::new(Cell::new(0));
        let mut history = LinearHistory::new();
        history.add_command(add(&value, 7));
        assert_eq!(history.undo_description(), Some("add 7"));
        assert_eq!(history.redo_description(), None);
        history.undo_last_command();
        assert_eq!(history.undo_description(), None);
        assert_eq!(history.redo_description(), Some("add 7"));
    }

    #[test]
    fn clear_keeps_saved_state() {
        let value = Rc::new(Cell::new(0));
        let mut history = LinearHistory::new();
        history.add_command(add(&value, 1));
        history.save();
        history.clear();
        assert!(history.is_empty());
        assert!(history.is_saved());

        history.add_command(add(&value, 1));
        history.clear();
        assert!(!history.is_saved());
    }
}
