// THEORY:
// Every failure the core can report is a programmer error, not a transient run-time
// condition. There are exactly two kinds: touching a coordinate outside the grid,
// and calling an operation with parameters it cannot honor. Operations surface
// them synchronously and never retry or clamp.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PictureError {
    #[error("pixel ({row}, {col}) is outside a {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PictureError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PictureError>;
