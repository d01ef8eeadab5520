//! Showreel Core - Foundation types for the sequence player
//!
//! This crate provides the fundamental types used throughout Showreel:
//! - Exact time arithmetic (Seconds)
//! - Identifier newtypes (MediaId, ClipId)
//! - The error taxonomy

pub mod error;
pub mod id;
pub mod time;

pub use error::{Result, ShowreelError};
pub use id::{ClipId, MediaId};
pub use time::Seconds;

/// Tuning constants shared across the workspace.
pub mod defaults {
    use crate::time::Seconds;
    use std::time::Duration;

    /// Minimum clip length. Resizing clamps against this so a clip can
    /// never degenerate to zero or negative length.
    pub const MIN_CLIP_LEN: Seconds = Seconds::from_raw(1, 10);

    /// How close to the native duration an untrimmed video is considered
    /// finished. Decoders rarely report the exact last timestamp.
    pub const END_EPSILON: Seconds = Seconds::from_raw(1, 20);

    /// Delay between the decision to advance and loading the next source,
    /// so the advance decision never runs inside a source callback.
    pub const ADVANCE_DELAY: Duration = Duration::from_millis(50);

    /// Dwell time for images that carry no per-item duration.
    pub const DEFAULT_PHOTO_DURATION: Seconds = Seconds::from_raw(3, 1);
}
