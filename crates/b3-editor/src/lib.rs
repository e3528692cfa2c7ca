//! History layer of the b3 behavior-tree editor.
//!
//! Builds on `b3-history` with the editor's own structure: node
//! definitions grouped by directory and category, one history per open
//! tree, and the shortcuts that drive them.

pub mod config;
pub mod error;
pub mod group;
pub mod grouped;
pub mod session;
pub mod shortcuts;

pub use config::HistoryConfig;
pub use error::{EditorError, Result};
pub use group::{ExportHierarchy, Group, escape, group_hash};
pub use grouped::GroupedHistory;
pub use session::{EditorHistory, HistoryFocus};
pub use shortcuts::{HistoryAction, HistoryShortcut};
