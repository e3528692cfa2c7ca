//! Per-session history ownership.
//!
//! The editor owns exactly one `EditorHistory`: a linear history for each
//! open behavior tree plus one [`GroupedHistory`] for the node-definition
//! library. Views receive it explicitly and route undo/redo/save to
//! whichever surface has focus.

use crate::config::HistoryConfig;
use crate::error::Result;
use crate::group::Group;
use crate::grouped::GroupedHistory;
use crate::shortcuts::HistoryAction;
use b3_history::{Command, LinearHistory};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Which history a shortcut or menu action applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryFocus {
    /// The tree with this name.
    Tree(String),
    NodeLibrary,
}

#[derive(Debug)]
pub struct EditorHistory {
    config: HistoryConfig,
    trees: HashMap<String, LinearHistory>,
    nodes: GroupedHistory,
}

impl EditorHistory {
    /// # Errors
    /// `EditorError::History` if the config holds a zero bound.
    pub fn new(config: HistoryConfig) -> Result<Self> {
        config.validate()?;
        let nodes = GroupedHistory::bounded(config.node_max_length)?;
        Ok(Self {
            config,
            trees: HashMap::new(),
            nodes,
        })
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ─── Trees ───────────────────────────────────────────────────────────

    /// History of `tree`, created if the tree was not open yet. A tree that
    /// was never written to disk starts unsaved.
    pub fn open_tree(&mut self, tree: &str, on_disk: bool) -> Result<&mut LinearHistory> {
        match self.trees.entry(tree.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut history = LinearHistory::bounded(self.config.tree_max_length)?;
                if !on_disk {
                    history.mark_unsaved();
                }
                log::debug!("opened history for tree `{tree}`");
                Ok(entry.insert(history))
            }
        }
    }

    /// Drop the history of a closed tree.
    pub fn close_tree(&mut self, tree: &str) -> Option<LinearHistory> {
        let closed = self.trees.remove(tree);
        if closed.is_some() {
            log::debug!("closed history for tree `{tree}`");
        }
        closed
    }

    pub fn tree(&self, tree: &str) -> Option<&LinearHistory> {
        self.trees.get(tree)
    }

    pub fn tree_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.trees.keys().map(String::as_str)
    }

    /// Run `cmd` on `tree`, opening its history if needed.
    pub fn add_tree_command(&mut self, tree: &str, cmd: Box<dyn Command>) -> Result<()> {
        self.open_tree(tree, true)?.add_command(cmd);
        Ok(())
    }

    pub fn undo_tree(&mut self, tree: &str) -> bool {
        self.trees
            .get_mut(tree)
            .is_some_and(LinearHistory::undo_last_command)
    }

    pub fn redo_tree(&mut self, tree: &str) -> bool {
        self.trees
            .get_mut(tree)
            .is_some_and(LinearHistory::redo_next_command)
    }

    /// Trees without a history were never edited and count as saved.
    pub fn tree_is_saved(&self, tree: &str) -> bool {
        self.trees.get(tree).is_none_or(LinearHistory::is_saved)
    }

    pub fn save_tree(&mut self, tree: &str) -> bool {
        let Some(history) = self.trees.get_mut(tree) else {
            return false;
        };
        history.save();
        log::debug!("saved tree `{tree}`");
        true
    }

    // ─── Node library ────────────────────────────────────────────────────

    pub fn add_node_command(&mut self, groups: &[Group], cmd: Box<dyn Command>) -> Result<()> {
        self.nodes.add_command(groups, cmd)
    }

    pub fn nodes(&self) -> &GroupedHistory {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut GroupedHistory {
        &mut self.nodes
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Everything saved: every open tree and the whole node library.
    pub fn is_saved(&self) -> bool {
        self.trees.values().all(LinearHistory::is_saved) && self.nodes.is_saved()
    }

    /// Apply a history action to the focused surface. Returns whether
    /// anything happened.
    pub fn apply(&mut self, action: HistoryAction, focus: &HistoryFocus) -> bool {
        log::trace!("{action:?} on {focus:?}");
        match (action, focus) {
            (HistoryAction::Undo, HistoryFocus::Tree(tree)) => self.undo_tree(tree),
            (HistoryAction::Redo, HistoryFocus::Tree(tree)) => self.redo_tree(tree),
            (HistoryAction::Save, HistoryFocus::Tree(tree)) => self.save_tree(tree),
            (HistoryAction::Undo, HistoryFocus::NodeLibrary) => self.nodes.undo_last_command(),
            (HistoryAction::Redo, HistoryFocus::NodeLibrary) => self.nodes.redo_next_command(),
            (HistoryAction::Save, HistoryFocus::NodeLibrary) => {
                self.nodes.save();
                true
            }
        }
    }
}
