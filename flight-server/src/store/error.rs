//! Flight store error types.

/// Errors from loading the CSV snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The snapshot file does not exist
    #[error("flight snapshot not found at {path}")]
    SnapshotMissing { path: String },

    /// Reading the snapshot failed
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot is not parseable CSV
    #[error("failed to parse snapshot: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("snapshot is missing column {0:?}")]
    MissingColumn(&'static str),
}
