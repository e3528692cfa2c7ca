//! Command history engine for the b3 behavior-tree editor.
//!
//! - [`LinearHistory`]: one bounded undo/redo list with save tracking.
//! - [`WeavedHistory`]: many named histories undone in a single global
//!   order, with joint actions kept atomic by [`ChainCommand`] markers.
//!
//! The engine is single-threaded and synchronous. It never inspects a
//! command beyond the [`Command`] trait.

pub mod command;
pub mod error;
pub mod linear;
pub mod node;
pub mod weave;

pub use command::{ChainCommand, ClosureCommand, ClosureCommandBuilder, Command};
pub use error::{HistoryError, Result};
pub use linear::LinearHistory;
pub use node::{HistoryNode, NodeList, NodeRef};
pub use weave::WeavedHistory;
