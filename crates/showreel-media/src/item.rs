//! Media item types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use showreel_core::{MediaId, Seconds};
use smallvec::SmallVec;

use crate::clip::ClipRange;

/// Kind of media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Image,
}

/// One entry in the project's media list.
///
/// Owned exclusively by the [`MediaLibrary`](crate::library::MediaLibrary);
/// `order` is maintained dense and zero-based by the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    /// Stable identifier
    pub id: MediaId,
    /// Display name
    pub name: String,
    /// Source locator (file path or URL)
    pub source: String,
    /// Video or image
    pub kind: MediaKind,
    /// Native duration. Video only; `None` until measured by the prober.
    pub duration: Option<Seconds>,
    /// Dwell time override. Image only; `None` means the project default.
    pub photo_duration: Option<Seconds>,
    /// When the item was added to the project.
    pub created_at: DateTime<Utc>,
    /// Caption overlay text.
    pub caption: String,
    /// Whether the caption is shown during playback.
    pub show_caption: bool,
    /// Display order within the library. Unique, dense, zero-based.
    pub order: usize,
    /// Sub-ranges carved out of the native timeline. Video only; empty
    /// means the whole video plays.
    pub clips: SmallVec<[ClipRange; 4]>,
}

impl MediaItem {
    /// Create a new video item. Duration stays unknown until measured.
    pub fn video(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::with_kind(name, source, MediaKind::Video)
    }

    /// Create a new image item.
    pub fn image(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::with_kind(name, source, MediaKind::Image)
    }

    fn with_kind(name: impl Into<String>, source: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: MediaId::new(),
            name: name.into(),
            source: source.into(),
            kind,
            duration: None,
            photo_duration: None,
            created_at: Utc::now(),
            caption: String::new(),
            show_caption: false,
            order: 0,
            clips: SmallVec::new(),
        }
    }

    /// Check whether this item is a video.
    #[inline]
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}
