//! Error types shared by the folio crates

use thiserror::Error;

/// Errors raised by the charting core
///
/// Malformed records are not errors: shapers drop them. These variants cover
/// caller mistakes and undecodable snapshots.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// A mark referenced a label that is not on its categorical axis
    #[error("unknown category {label:?} (axis has {known} labels)")]
    UnknownCategory { label: String, known: usize },

    /// The bundled or supplied snapshot could not be decoded
    #[error("snapshot decode failed: {message}")]
    Snapshot { message: String },
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        Self::Snapshot {
            message: err.to_string(),
        }
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
