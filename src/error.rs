use plotters::drawing::DrawingAreaErrorKind;
use std::error::Error as StdError;
use thiserror::Error;

/// Errors surfaced by chart construction and rendering.
///
/// Absent data values are not an error; a `None` measurement simply draws no
/// bar. Every variant here is fatal to the single render call that raised it.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Dataset or spec shape mismatch: series length vs. category count,
    /// color count shorter than the series count, and the like.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The output location is missing or unreadable.
    #[error("output path error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure inside the drawing backend.
    #[error("drawing error: {0}")]
    Draw(String),
}

impl<E: StdError + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Draw(err.to_string())
    }
}
