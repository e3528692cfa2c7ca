//! Many independent histories undone in one global timeline.
//!
//! Each named stack is a [`LinearHistory`] with its own bound and its own
//! save point. A shared insertion-order list records which stack received
//! each command, so undo/redo walks that list and delegates to the stack
//! named at each position.
//!
//! A joint action touching several stacks is recorded as a contiguous run
//! of positions: a [`ChainCommand`] for every stack but the first, then the
//! real command on the first stack.
//!
//! ```text
//! order:   … ⇄ [b] ⇄ [c] ⇄ [a] ⇄ …
//! stacks:       │     │     └─ a: real command
//!               │     └─ c: chain
//!               └─ b: chain
//! ```
//!
//! Undo reverts the real command, then keeps undoing while the stack at
//! the next position back sits on a chain marker. Redo walks forward
//! through the chain markers until it re-applies the real command. Either
//! way one call moves the whole action.
//!
//! Stacks evict independently, so the order list can hold positions whose
//! command is gone. Such a position is spliced out the first time undo or
//! redo reaches it and does not count as a step.
//!
//! Stack bounds cap the commands each stack holds, not the order list:
//! positions of evicted commands stay until undo walks back to them or a
//! new command truncates past them, so the list grows by one entry per
//! recorded command in a session that never undoes that far.

use crate::command::{ChainCommand, Command};
use crate::error::{HistoryError, Result, check_max_length};
use crate::linear::LinearHistory;
use crate::node::{NodeList, NodeRef};
use lasso::{Rodeo, Spur};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

pub struct WeavedHistory {
    /// Stack ids, interned per weave.
    keys: Rodeo,
    stacks: HashMap<Spur, LinearHistory>,
    /// Which stack received each command, oldest first.
    order: NodeList<Spur>,
    /// Most recently applied position; `None` before the first one.
    cursor: Option<NodeRef>,
    default_max_length: Option<usize>,
}

impl fmt::Debug for WeavedHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeavedHistory")
            .field("stacks", &self.stacks.len())
            .field("positions", &self.order.len())
            .field("default_max_length", &self.default_max_length)
            .finish()
    }
}

impl Default for WeavedHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl WeavedHistory {
    /// A weave whose stacks are unbounded unless given a bound explicitly.
    pub fn new() -> Self {
        Self {
            keys: Rodeo::default(),
            stacks: HashMap::new(),
            order: NodeList::new(),
            cursor: None,
            default_max_length: None,
        }
    }

    /// # Errors
    /// `HistoryError::InvalidMaxLength` when `max_length` is zero.
    pub fn with_default_max_length(max_length: usize) -> Result<Self> {
        Self::bounded(Some(max_length))
    }

    /// Bound applied to stacks created implicitly or without their own.
    pub fn bounded(default_max_length: Option<usize>) -> Result<Self> {
        Ok(Self {
            default_max_length: check_max_length(default_max_length)?,
            ..Self::new()
        })
    }

    // ─── Stacks ──────────────────────────────────────────────────────────

    /// Create or replace the stack `id`. `None` uses the weave's default
    /// bound.
    ///
    /// Replacing a stack leaves its old positions in the order list; they
    /// are skipped as exhausted when reached.
    pub fn add_stack(&mut self, id: &str, max_length: Option<usize>) -> Result<()> {
        let stack = LinearHistory::bounded(max_length.or(self.default_max_length))?;
        let key = self.keys.get_or_intern(id);
        if self.stacks.insert(key, stack).is_some() {
            log::debug!("replaced history stack `{id}`");
        } else {
            log::debug!("created history stack `{id}`");
        }
        Ok(())
    }

    pub fn has_stack(&self, id: &str) -> bool {
        self.stack(id).is_some()
    }

    pub fn stack(&self, id: &str) -> Option<&LinearHistory> {
        self.keys.get(id).and_then(|key| self.stacks.get(&key))
    }

    pub fn stack_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.stacks.keys().map(|key| self.keys.resolve(key))
    }

    /// Number of live positions in the shared order list.
    pub fn positions(&self) -> usize {
        self.order.len()
    }

    fn ensure_stack(&mut self, id: &str) -> Spur {
        let key = self.keys.get_or_intern(id);
        if !self.stacks.contains_key(&key) {
            log::debug!("created history stack `{id}`");
            self.stacks
                .insert(key, LinearHistory::with_checked_bound(self.default_max_length));
        }
        key
    }

    // ─── Recording ───────────────────────────────────────────────────────

    /// Run `cmd` and record it on stack `id`, creating the stack if needed.
    pub fn add_command_to_stack(&mut self, id: &str, cmd: Box<dyn Command>) {
        let key = self.ensure_stack(id);
        self.discard_ahead();
        self.cursor = Some(self.order.push_back(key));
        if let Some(stack) = self.stacks.get_mut(&key) {
            stack.add_command(cmd);
        }
    }

    /// Record one action that affects every stack in `ids`.
    ///
    /// Duplicate ids are ignored. The first id receives `cmd`; the others
    /// receive chain markers so their save state changes too.
    ///
    /// # Errors
    /// `HistoryError::EmptyStackList` when `ids` is empty. Nothing is
    /// recorded or run in that case.
    pub fn add_command_to_stacks<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        cmd: Box<dyn Command>,
    ) -> Result<()> {
        let mut unique: SmallVec<[&str; 4]> = SmallVec::new();
        for id in ids {
            let id = id.as_ref();
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        let Some((&first, rest)) = unique.split_first() else {
            return Err(HistoryError::EmptyStackList);
        };

        for &id in rest {
            self.add_command_to_stack(id, Box::new(ChainCommand));
        }
        self.add_command_to_stack(first, cmd);
        if !rest.is_empty() {
            log::trace!("joint action on `{first}` chained to {rest:?}");
        }
        Ok(())
    }

    /// Drop positions ahead of the cursor along with the redo branches of
    /// the stacks they named.
    fn discard_ahead(&mut self) {
        for key in self.order.truncate_after(self.cursor) {
            if let Some(stack) = self.stacks.get_mut(&key) {
                stack.clear_redo();
            }
        }
    }

    // ─── Undo / redo ─────────────────────────────────────────────────────

    /// Undo the most recent action across all stacks. Returns `false` when
    /// nothing could be undone.
    pub fn undo_last_command(&mut self) -> bool {
        let mut undone = false;
        while let Some(at) = self.cursor {
            let prev = self.order.prev(at);
            let Some(&key) = self.order.data(at) else {
                break;
            };
            debug_assert!(
                self.stacks.contains_key(&key),
                "order list names an unknown stack"
            );

            let stepped = self
                .stacks
                .get_mut(&key)
                .is_some_and(LinearHistory::undo_last_command);
            self.cursor = prev;
            if !stepped {
                log::debug!(
                    "dropped exhausted position of stack `{}`",
                    self.keys.resolve(&key)
                );
                self.order.unlink(at);
                continue;
            }

            undone = true;
            if !self.chain_at(prev) {
                break;
            }
            log::trace!("absorbing chain marker on `{}`", self.resolve_at(prev));
        }
        undone
    }

    /// Redo the next action across all stacks. Returns `false` when
    /// nothing could be redone.
    pub fn redo_next_command(&mut self) -> bool {
        let mut redone = false;
        while let Some(target) = self.order.after(self.cursor) {
            let Some(&key) = self.order.data(target) else {
                break;
            };

            let stepped = self
                .stacks
                .get_mut(&key)
                .is_some_and(LinearHistory::redo_next_command);
            if !stepped {
                log::debug!(
                    "dropped exhausted position of stack `{}`",
                    self.keys.resolve(&key)
                );
                self.order.unlink(target);
                continue;
            }

            redone = true;
            self.cursor = Some(target);
            if !self.chain_at(Some(target)) {
                break;
            }
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        let mut at = self.cursor;
        while let Some(current) = at {
            if self.stack_at(current).is_some_and(LinearHistory::can_undo) {
                return true;
            }
            at = self.order.prev(current);
        }
        false
    }

    pub fn can_redo(&self) -> bool {
        let mut at = self.order.after(self.cursor);
        while let Some(current) = at {
            if self.stack_at(current).is_some_and(LinearHistory::can_redo) {
                return true;
            }
            at = self.order.next(current);
        }
        false
    }

    fn stack_at(&self, at: NodeRef) -> Option<&LinearHistory> {
        self.order.data(at).and_then(|key| self.stacks.get(key))
    }

    fn chain_at(&self, at: Option<NodeRef>) -> bool {
        at.and_then(|at| self.stack_at(at))
            .is_some_and(LinearHistory::has_chain_command)
    }

    fn resolve_at(&self, at: Option<NodeRef>) -> &str {
        at.and_then(|at| self.order.data(at))
            .map_or("", |key| self.keys.resolve(key))
    }

    // ─── Save tracking ───────────────────────────────────────────────────

    /// Save state of stack `id`. A stack that was never touched is saved.
    pub fn stack_is_saved(&self, id: &str) -> bool {
        self.stack(id).is_none_or(LinearHistory::is_saved)
    }

    /// Mark stack `id` saved. Returns `false` if no such stack exists.
    pub fn save_stack(&mut self, id: &str) -> bool {
        let Some(stack) = self.keys.get(id).and_then(|key| self.stacks.get_mut(&key)) else {
            return false;
        };
        stack.save();
        log::debug!("saved history stack `{id}`");
        true
    }

    pub fn is_saved(&self) -> bool {
        self.stacks.values().all(LinearHistory::is_saved)
    }

    pub fn save(&mut self) {
        for stack in self.stacks.values_mut() {
            stack.save();
        }
    }
}
