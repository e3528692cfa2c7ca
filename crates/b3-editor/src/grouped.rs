//! Save tracking for the node-definition library.
//!
//! Each group *(directory, category-or-type)* maps onto one stack of a
//! [`WeavedHistory`], so undo/redo stays global while every group can be
//! saved on its own. Saved status is answered at group, type, directory,
//! and library level; anything never touched counts as saved.

use crate::error::{EditorError, Result};
use crate::group::{ACTION, ExportHierarchy, Group, NODE_TYPES, group_hash};
use b3_history::{Command, WeavedHistory};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
pub struct GroupedHistory {
    inner: WeavedHistory,
    /// Action categories seen per directory.
    dir_categories: BTreeMap<String, BTreeSet<String>>,
    known_dirs: BTreeSet<String>,
}

impl GroupedHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups get at most `max_length` undo steps each; `None` = unbounded.
    pub fn bounded(max_length: Option<usize>) -> Result<Self> {
        Ok(Self {
            inner: WeavedHistory::bounded(max_length)?,
            ..Self::default()
        })
    }

    pub fn history(&self) -> &WeavedHistory {
        &self.inner
    }

    // ─── Recording ───────────────────────────────────────────────────────

    /// Run `cmd` as one action affecting every group in `groups`.
    ///
    /// # Errors
    /// `EditorError::NoGroups` for an empty list; nothing runs.
    pub fn add_command(&mut self, groups: &[Group], cmd: Box<dyn Command>) -> Result<()> {
        if groups.is_empty() {
            return Err(EditorError::NoGroups);
        }

        let mut hashes: SmallVec<[String; 4]> = SmallVec::with_capacity(groups.len());
        for group in groups {
            if group.is_action() {
                self.dir_categories
                    .entry(group.origin_directory.clone())
                    .or_default()
                    .insert(group.slot().to_string());
            }
            self.known_dirs.insert(group.origin_directory.clone());
            hashes.push(group.hash());
        }

        log::trace!("node command `{}` on {hashes:?}", cmd.description());
        self.inner.add_command_to_stacks(hashes.as_slice(), cmd)?;
        Ok(())
    }

    pub fn undo_last_command(&mut self) -> bool {
        self.inner.undo_last_command()
    }

    pub fn redo_next_command(&mut self) -> bool {
        self.inner.redo_next_command()
    }

    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn category_is_saved(&self, dir: &str, category: &str) -> bool {
        self.inner.stack_is_saved(&group_hash(dir, category))
    }

    /// Actions are saved when every cached category is; other types are
    /// their own slot.
    pub fn type_is_saved(&self, dir: &str, node_type: &str) -> bool {
        if node_type != ACTION {
            return self.category_is_saved(dir, node_type);
        }
        self.dir_categories.get(dir).is_none_or(|categories| {
            categories
                .iter()
                .all(|category| self.category_is_saved(dir, category))
        })
    }

    pub fn dir_is_saved(&self, dir: &str) -> bool {
        NODE_TYPES
            .iter()
            .all(|node_type| self.type_is_saved(dir, node_type))
    }

    pub fn is_saved(&self) -> bool {
        self.known_dirs.iter().all(|dir| self.dir_is_saved(dir))
    }

    pub fn known_dirs(&self) -> impl Iterator<Item = &str> + '_ {
        self.known_dirs.iter().map(String::as_str)
    }

    /// Action categories seen under `dir`, sorted.
    pub fn categories(&self, dir: &str) -> impl Iterator<Item = &str> + '_ {
        self.dir_categories
            .get(dir)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Directories with unsaved changes, sorted.
    pub fn unsaved_dirs(&self) -> Vec<&str> {
        self.known_dirs()
            .filter(|dir| !self.dir_is_saved(dir))
            .collect()
    }

    // ─── Saving ──────────────────────────────────────────────────────────

    /// Mark saved every group whose entry in `export` is `true`.
    pub fn save_hierarchy(&mut self, export: &ExportHierarchy) {
        for (dir, categories) in export {
            for (category, _) in categories.iter().filter(|(_, save)| **save) {
                if self.inner.save_stack(&group_hash(dir, category)) {
                    log::debug!("saved group {dir}/{category}");
                }
            }
        }
    }

    /// Parse an export hierarchy from JSON and apply it.
    ///
    /// # Errors
    /// `EditorError::Config` for malformed JSON; nothing is saved.
    pub fn save_hierarchy_json(&mut self, json: &str) -> Result<()> {
        let export: ExportHierarchy = serde_json::from_str(json)?;
        self.save_hierarchy(&export);
        Ok(())
    }

    /// Mark every group saved.
    pub fn save(&mut self) {
        self.inner.save();
    }
}
