//! The project's ordered media list and its editing commands.

use serde::{Deserialize, Serialize};
use showreel_core::defaults::DEFAULT_PHOTO_DURATION;
use showreel_core::{MediaId, Seconds};
use tracing::debug;

use crate::duration;
use crate::item::MediaItem;

/// Project-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Dwell time for images without a per-item override.
    pub default_photo_duration: Seconds,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            default_photo_duration: DEFAULT_PHOTO_DURATION,
        }
    }
}

/// The ordered media list of one project.
///
/// Items are stored in display order; `item.order` always equals the item's
/// position and stays dense across removal and reordering. While a playback
/// session is active the library is frozen and editing commands are
/// silently ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaLibrary {
    items: Vec<MediaItem>,
    /// Project settings (default photo dwell).
    pub settings: ProjectSettings,
    #[serde(skip)]
    frozen: bool,
}

impl MediaLibrary {
    /// Create an empty library with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Items in display order.
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the library holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an item by id.
    pub fn item(&self, id: MediaId) -> Option<&MediaItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Mutable access for clip editing. Returns `None` while frozen.
    pub fn item_mut(&mut self, id: MediaId) -> Option<&mut MediaItem> {
        if self.frozen {
            debug!(%id, "edit ignored: library frozen during playback");
            return None;
        }
        self.items.iter_mut().find(|i| i.id == id)
    }

    // ── Derived durations ───────────────────────────────────────

    /// Post-trim playable length of one item.
    pub fn effective_duration_of(&self, id: MediaId) -> Option<Seconds> {
        self.item(id)
            .map(|item| duration::effective_duration(item, self.settings.default_photo_duration))
    }

    /// Untrimmed project length.
    pub fn total_length(&self) -> Seconds {
        duration::total_length(&self.items, self.settings.default_photo_duration)
    }

    /// Post-trim project length.
    pub fn edited_length(&self) -> Seconds {
        duration::edited_length(&self.items, self.settings.default_photo_duration)
    }

    // ── Editing commands ────────────────────────────────────────

    /// Append a new video item. Returns its id, or `None` while frozen.
    pub fn add_video(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Option<MediaId> {
        self.push_item(MediaItem::video(name, source))
    }

    /// Append a new image item. Returns its id, or `None` while frozen.
    pub fn add_image(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Option<MediaId> {
        self.push_item(MediaItem::image(name, source))
    }

    fn push_item(&mut self, mut item: MediaItem) -> Option<MediaId> {
        if self.frozen {
            debug!("add ignored: library frozen during playback");
            return None;
        }
        item.order = self.items.len();
        let id = item.id;
        self.items.push(item);
        Some(id)
    }

    /// Remove an item; remaining orders are reindexed dense.
    pub fn remove(&mut self, id: MediaId) -> bool {
        if self.frozen {
            debug!(%id, "remove ignored: library frozen during playback");
            return false;
        }
        let Some(pos) = self.items.iter().position(|i| i.id == id) else {
            return false;
        };
        self.items.remove(pos);
        self.reindex();
        true
    }

    /// Move an item to a new display position. The index is clamped to the
    /// end of the list; orders stay dense.
    pub fn move_item(&mut self, id: MediaId, new_index: usize) -> bool {
        if self.frozen {
            debug!(%id, "reorder ignored: library frozen during playback");
            return false;
        }
        let Some(pos) = self.items.iter().position(|i| i.id == id) else {
            return false;
        };
        let item = self.items.remove(pos);
        let dest = new_index.min(self.items.len());
        self.items.insert(dest, item);
        self.reindex();
        true
    }

    /// Rename an item.
    pub fn rename(&mut self, id: MediaId, name: impl Into<String>) -> bool {
        self.update(id, |item| item.name = name.into())
    }

    /// Set an item's caption text.
    pub fn set_caption(&mut self, id: MediaId, caption: impl Into<String>) -> bool {
        self.update(id, |item| item.caption = caption.into())
    }

    /// Show or hide an item's caption during playback.
    pub fn set_show_caption(&mut self, id: MediaId, show: bool) -> bool {
        self.update(id, |item| item.show_caption = show)
    }

    /// Set or clear an image's dwell override. `None` falls back to the
    /// project default.
    pub fn set_photo_duration(&mut self, id: MediaId, dwell: Option<Seconds>) -> bool {
        self.update(id, |item| item.photo_duration = dwell)
    }

    /// Record a video's measured native duration (reported by the external
    /// prober).
    pub fn set_video_duration(&mut self, id: MediaId, duration: Seconds) -> bool {
        self.update(id, |item| item.duration = Some(duration))
    }

    /// Change the project default photo dwell.
    pub fn set_default_photo_duration(&mut self, dwell: Seconds) -> bool {
        if self.frozen {
            debug!("settings edit ignored: library frozen during playback");
            return false;
        }
        self.settings.default_photo_duration = dwell;
        true
    }

    fn update(&mut self, id: MediaId, apply: impl FnOnce(&mut MediaItem)) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                apply(item);
                true
            }
            None => false,
        }
    }

    fn reindex(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.order = index;
        }
    }

    // ── Playback lock ───────────────────────────────────────────

    /// Freeze the library for the lifetime of a playback session.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Release the playback freeze.
    pub fn thaw(&mut self) {
        self.frozen = false;
    }

    /// Whether the library currently rejects edits.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
