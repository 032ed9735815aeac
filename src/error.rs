//! Error taxonomy shared by generation, streaming and persistence.

use crate::point::IntPoint;

/// Errors raised by the world engine.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A coordinate fell outside the grid or window it was resolved against.
    #[error("coordinate ({row}, {col}) is outside a {width}x{height} area")]
    OutOfBounds {
        row: i32,
        col: i32,
        width: usize,
        height: usize,
    },
    /// A saved chunk could not be decoded.
    #[error("persisted chunk ({}, {}) is corrupt: {reason}", coord.row, coord.col)]
    CorruptPersistedChunk { coord: IntPoint, reason: String },
    /// Generator parameters that cannot produce valid geometry.
    #[error("invalid generation parameters: {0}")]
    GenerationParameter(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl WorldError {
    pub fn out_of_bounds(point: IntPoint, width: usize, height: usize) -> Self {
        WorldError::OutOfBounds {
            row: point.row,
            col: point.col,
            width,
            height,
        }
    }

    pub fn corrupt(coord: IntPoint, reason: impl Into<String>) -> Self {
        WorldError::CorruptPersistedChunk {
            coord,
            reason: reason.into(),
        }
    }

    pub fn parameter(message: impl Into<String>) -> Self {
        WorldError::GenerationParameter(message.into())
    }
}

pub type Result<T> = std::result::Result<T, WorldError>;
