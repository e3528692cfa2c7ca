//! Group identifiers for the node-definition library.
//!
//! Every node definition belongs to a directory and is either an action
//! (organised by category) or one of the structural types. A group is the
//! pair *(directory, category-or-type)*; each group owns one save unit,
//! keyed by an escaped hash string:
//!
//! ```text
//! escape(directory) ":" escape(category ?? type)
//! ```
//!
//! `escape` prefixes `\` and `:` with `\`, so the separator can never be
//! forged from inside either half.

use serde::Deserialize;
use std::collections::BTreeMap;

// ─── Node types ──────────────────────────────────────────────────────────

pub const ACTION: &str = "action";
pub const COMPOSITE: &str = "composite";
pub const DECORATOR: &str = "decorator";
pub const MODULE: &str = "module";

/// Every node type a directory can hold.
pub const NODE_TYPES: [&str; 4] = [ACTION, COMPOSITE, DECORATOR, MODULE];

/// Save requests from the export dialog: directory → category → save?
pub type ExportHierarchy = BTreeMap<String, BTreeMap<String, bool>>;

// ─── Group descriptor ────────────────────────────────────────────────────

/// One group touched by a node-library command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub origin_directory: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
}

impl Group {
    pub fn new(origin_directory: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            origin_directory: origin_directory.into(),
            category: None,
            node_type: node_type.into(),
        }
    }

    /// An action group inside `category`.
    pub fn action(origin_directory: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            origin_directory: origin_directory.into(),
            category: Some(category.into()),
            node_type: ACTION.to_string(),
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_action(&self) -> bool {
        self.node_type == ACTION
    }

    /// Second half of the key: the category when present, else the type.
    pub fn slot(&self) -> &str {
        self.category.as_deref().unwrap_or(&self.node_type)
    }

    pub fn hash(&self) -> String {
        group_hash(&self.origin_directory, self.slot())
    }
}

// ─── Encoding ────────────────────────────────────────────────────────────

/// Prefix every `\` and `:` with `\`.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || c == ':' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Stack key for the group `(directory, slot)`.
pub fn group_hash(directory: &str, slot: &str) -> String {
    format!("{}:{}", escape(directory), escape(slot))
}
