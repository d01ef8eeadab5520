//! Immutable playlist snapshots.
//!
//! A playlist is taken at the moment playback starts. Entries copy
//! everything the sequencer needs out of the live media list, so edits made
//! after the snapshot cannot be observed by a running session.

use showreel_core::{MediaId, Result, Seconds, ShowreelError};
use showreel_media::clip::ClipRange;
use showreel_media::{effective_duration, MediaItem, MediaKind, MediaLibrary};
use smallvec::SmallVec;

/// Where a playback session begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Play the whole list from the head.
    FromStart,
    /// Play from the entry with this id to the end of the list.
    FromSelected(MediaId),
}

/// One snapshotted media entry.
#[derive(Debug, Clone)]
pub struct PlaylistEntry {
    pub id: MediaId,
    pub name: String,
    pub source: String,
    pub kind: MediaKind,
    /// Native duration at snapshot time (video only).
    pub duration: Option<Seconds>,
    /// Clip set at snapshot time, ascending by start.
    pub clips: SmallVec<[ClipRange; 4]>,
    pub caption: String,
    pub show_caption: bool,
    /// Post-trim playable length, precomputed with the snapshot's default
    /// photo dwell.
    pub effective: Seconds,
}

impl PlaylistEntry {
    fn snapshot(item: &MediaItem, default_photo: Seconds) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            source: item.source.clone(),
            kind: item.kind,
            duration: item.duration,
            clips: item.clips.clone(),
            caption: item.caption.clone(),
            show_caption: item.show_caption,
            effective: effective_duration(item, default_photo),
        }
    }
}

/// An ordered, immutable snapshot of media items driving one playback
/// session. Never empty: [`Playlist::build`] refuses to produce one.
#[derive(Debug, Clone)]
pub struct Playlist {
    entries: Vec<PlaylistEntry>,
}

impl Playlist {
    /// Snapshot the library in display order.
    ///
    /// `FromSelected` slices from the entry with the given id; an unknown
    /// id or an empty library yields `EmptyPlaylist` and playback start is
    /// refused.
    pub fn build(library: &MediaLibrary, mode: StartMode) -> Result<Self> {
        let items = library.items();
        let from = match mode {
            StartMode::FromStart => 0,
            StartMode::FromSelected(id) => items
                .iter()
                .position(|item| item.id == id)
                .ok_or(ShowreelError::EmptyPlaylist)?,
        };

        let default_photo = library.settings.default_photo_duration;
        let entries: Vec<PlaylistEntry> = items[from..]
            .iter()
            .map(|item| PlaylistEntry::snapshot(item, default_photo))
            .collect();

        if entries.is_empty() {
            return Err(ShowreelError::EmptyPlaylist);
        }
        Ok(Self { entries })
    }

    /// Number of entries. Always at least one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Playlists are never empty; kept for the usual convention.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`. Panics when out of bounds, as slices do.
    pub fn entry(&self, index: usize) -> &PlaylistEntry {
        &self.entries[index]
    }

    /// All entries in play order.
    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    /// The originally-selected item: the entry playback starts at.
    pub fn origin(&self) -> MediaId {
        self.entries[0].id
    }

    /// Global timeline time at which entry `index` begins: the sum of
    /// effective durations of every earlier entry.
    pub fn offset_of(&self, index: usize) -> Seconds {
        self.entries[..index]
            .iter()
            .fold(Seconds::ZERO, |acc, e| acc + e.effective)
    }
}
