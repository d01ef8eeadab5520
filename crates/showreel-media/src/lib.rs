//! Showreel Media - Data model and editing layer
//!
//! Implements the project's media list:
//! - Media items (videos with clip ranges, images with dwell times)
//! - The clip-range editing operations
//! - Pure duration aggregation (total and edited project length)
//! - The ordered library with its editing commands and playback freeze

pub mod clip;
pub mod duration;
pub mod item;
pub mod library;

pub use clip::{ClipEdge, ClipRange, PendingClip};
pub use duration::{edited_length, effective_duration, total_length};
pub use item::{MediaItem, MediaKind};
pub use library::{MediaLibrary, ProjectSettings};
