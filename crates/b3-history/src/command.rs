//! Reversible units of work.
//!
//! Every edit the editor performs is handed to a history as a `Command`
//! that has already captured whatever state it needs to apply and revert
//! itself. The history never looks inside a command: it only calls `run`,
//! `undo` and `redo`, and reads the two flags below.
//!
//! Commands that span several histories leave a [`ChainCommand`] marker in
//! every history but one, so each of them advances while the real effect
//! runs exactly once.

use crate::error::{HistoryError, Result};
use std::fmt;

/// A reversible unit of work.
///
/// `undo` must be the exact inverse of `run` on whatever state the command
/// touches. The history calls `run` once when the command is added and
/// `redo` on every later re-application.
pub trait Command {
    /// Apply the effect.
    fn run(&mut self);

    /// Revert the effect of the last `run`/`redo`.
    fn undo(&mut self);

    /// Re-apply after an undo. Defaults to `run`.
    fn redo(&mut self) {
        self.run();
    }

    /// Whether applying this command makes the document differ from what
    /// was last saved. View-only commands return `false`.
    fn modifies_save_data(&self) -> bool {
        true
    }

    /// Whether this is a placeholder recorded for a joint action.
    fn is_chain(&self) -> bool {
        false
    }

    /// Short human-readable label, e.g. `"Move block"`.
    fn description(&self) -> &str {
        ""
    }
}

impl fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("description", &self.description())
            .field("chain", &self.is_chain())
            .field("modifies_save_data", &self.modifies_save_data())
            .finish()
    }
}

// ─── Chain marker ────────────────────────────────────────────────────────

/// No-op placeholder that keeps a multi-history action atomic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainCommand;

impl Command for ChainCommand {
    fn run(&mut self) {}

    fn undo(&mut self) {}

    fn is_chain(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "chain"
    }
}

// ─── Closure commands ────────────────────────────────────────────────────

type Callback = Box<dyn FnMut()>;

/// A command assembled from closures over caller-owned state.
///
/// ```
/// use std::{cell::Cell, rc::Rc};
/// use b3_history::{ClosureCommand, Command};
///
/// let value = Rc::new(Cell::new(0));
/// let (up, down) = (value.clone(), value.clone());
/// let cmd = ClosureCommand::builder()
///     .description("increment")
///     .run(move || up.set(up.get() + 1))
///     .undo(move || down.set(down.get() - 1))
///     .build()
///     .unwrap();
/// assert_eq!(cmd.description(), "increment");
/// ```
pub struct ClosureCommand {
    run: Callback,
    undo: Callback,
    redo: Option<Callback>,
    description: String,
    modifies_save_data: bool,
}

impl ClosureCommand {
    pub fn builder() -> ClosureCommandBuilder {
        ClosureCommandBuilder::default()
    }

    /// Shorthand for the common run/undo pair.
    pub fn new(
        description: impl Into<String>,
        run: impl FnMut() + 'static,
        undo: impl FnMut() + 'static,
    ) -> Self {
        Self {
            run: Box::new(run),
            undo: Box::new(undo),
            redo: None,
            description: description.into(),
            modifies_save_data: true,
        }
    }
}

impl fmt::Debug for ClosureCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureCommand")
            .field("description", &self.description)
            .field("has_redo", &self.redo.is_some())
            .field("modifies_save_data", &self.modifies_save_data)
            .finish()
    }
}

impl Command for ClosureCommand {
    fn run(&mut self) {
        (self.run)();
    }

    fn undo(&mut self) {
        (self.undo)();
    }

    fn redo(&mut self) {
        match self.redo.as_mut() {
            Some(redo) => redo(),
            None => (self.run)(),
        }
    }

    fn modifies_save_data(&self) -> bool {
        self.modifies_save_data
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`ClosureCommand`]. `run` and `undo` are required.
pub struct ClosureCommandBuilder {
    run: Option<Callback>,
    undo: Option<Callback>,
    redo: Option<Callback>,
    description: String,
    modifies_save_data: bool,
}

impl Default for ClosureCommandBuilder {
    fn default() -> Self {
        Self {
            run: None,
            undo: None,
            redo: None,
            description: String::new(),
            modifies_save_data: true,
        }
    }
}

impl ClosureCommandBuilder {
    #[must_use]
    pub fn run(mut self, f: impl FnMut() + 'static) -> Self {
        self.run = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn undo(mut self, f: impl FnMut() + 'static) -> Self {
        self.undo = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn redo(mut self, f: impl FnMut() + 'static) -> Self {
        self.redo = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn modifies_save_data(mut self, modifies: bool) -> Self {
        self.modifies_save_data = modifies;
        self
    }

    /// # Errors
    /// `HistoryError::InvalidCommand` if `run` or `undo` was never set.
    pub fn build(self) -> Result<ClosureCommand> {
        let run = self.run.ok_or(HistoryError::InvalidCommand("run"))?;
        let undo = self.undo.ok_or(HistoryError::InvalidCommand("undo"))?;
        Ok(ClosureCommand {
            run,
            undo,
            redo: self.redo,
            description: self.description,
            modifies_save_data: self.modifies_save_data,
        })
    }
}
