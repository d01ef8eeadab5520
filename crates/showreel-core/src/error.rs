//! Error types for Showreel.

use crate::time::Seconds;
use thiserror::Error;

/// Main error type for Showreel operations.
///
/// There is no fatal category: every failure either refuses to start
/// (`EmptyPlaylist`), leaves state untouched (`InvalidRange`, `NotFound`),
/// or is recovered by skipping the offending item (`SourceLoad`).
#[derive(Error, Debug)]
pub enum ShowreelError {
    #[error("invalid clip range: end {end} is not after start {start}")]
    InvalidRange { start: Seconds, end: Seconds },

    #[error("source failed to load: {0}")]
    SourceLoad(String),

    #[error("playlist is empty")]
    EmptyPlaylist,

    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type alias for Showreel operations.
pub type Result<T> = std::result::Result<T, ShowreelError>;
