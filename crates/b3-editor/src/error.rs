use b3_history::HistoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Malformed history configuration or export hierarchy JSON.
    #[error("invalid history config: {0}")]
    Config(#[from] serde_json::Error),

    /// A node-library command named no affected groups.
    #[error("node command affects no groups")]
    NoGroups,
}

pub type Result<T> = std::result::Result<T, EditorError>;
