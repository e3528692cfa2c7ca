//! History limits for an editor session.
//!
//! Read from the `history` section of the editor settings, e.g.
//!
//! ```json
//! { "treeMaxLength": 200, "nodeMaxLength": null }
//! ```
//!
//! Missing fields take their defaults; `null` means unbounded.

use crate::error::Result;
use b3_history::HistoryError;
use serde::Deserialize;

/// Default undo depth, matching the canvas command stack.
pub const DEFAULT_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Undo depth of each open tree. Default: **100**.
    pub tree_max_length: Option<usize>,

    /// Undo depth of each node-library group. Default: **100**.
    pub node_max_length: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            tree_max_length: Some(DEFAULT_MAX_LENGTH),
            node_max_length: Some(DEFAULT_MAX_LENGTH),
        }
    }
}

impl HistoryConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    /// `EditorError::Config` for malformed JSON, `EditorError::History`
    /// when a bound is zero.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Unbounded trees and groups.
    pub fn unbounded() -> Self {
        Self {
            tree_max_length: None,
            node_max_length: None,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), HistoryError> {
        for bound in [self.tree_max_length, self.node_max_length] {
            if bound == Some(0) {
                return Err(HistoryError::InvalidMaxLength(0));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_use_defaults() {
        let config = HistoryConfig::from_json("{}").unwrap();
        assert_eq!(config, HistoryConfig::default());
    }

    #[test]
    fn null_means_unbounded() {
        let config = HistoryConfig::from_json(r#"{ "treeMaxLength": null, "nodeMaxLength": 5 }"#)
            .unwrap();
        assert_eq!(config.tree_max_length, None);
        assert_eq!(config.node_max_length, Some(5));
    }

    #[test]
    fn zero_bound_is_rejected() {
        let err = HistoryConfig::from_json(r#"{ "treeMaxLength": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            EditorError::History(HistoryError::InvalidMaxLength(0))
        ));
    }

    #[test]
    fn non_numeric_bound_is_rejected() {
        let err = HistoryConfig::from_json(r#"{ "treeMaxLength": "ten" }"#).unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }
}
