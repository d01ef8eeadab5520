//! Pure duration aggregation over the media list.
//!
//! No hidden state: everything here is re-derivable from the items and the
//! project default photo dwell, so there is no cache to invalidate.

use showreel_core::Seconds;

use crate::item::{MediaItem, MediaKind};

/// Post-trim playable length of one item.
///
/// Video with clips: sum of clip lengths. Video without clips: the full
/// native duration (absence of clips means "include everything"); an
/// unmeasured video counts as zero until the prober reports a duration.
/// Image: the per-item dwell or the project default.
pub fn effective_duration(item: &MediaItem, default_photo: Seconds) -> Seconds {
    match item.kind {
        MediaKind::Video => {
            if item.clips.is_empty() {
                item.duration.unwrap_or(Seconds::ZERO)
            } else {
                item.clips
                    .iter()
                    .fold(Seconds::ZERO, |acc, clip| acc + clip.len())
            }
        }
        MediaKind::Image => item.photo_duration.unwrap_or(default_photo),
    }
}

/// Untrimmed project length: full native duration for every video plus
/// the effective dwell for every image.
pub fn total_length<'a>(
    items: impl IntoIterator<Item = &'a MediaItem>,
    default_photo: Seconds,
) -> Seconds {
    items.into_iter().fold(Seconds::ZERO, |acc, item| {
        let len = match item.kind {
            MediaKind::Video => item.duration.unwrap_or(Seconds::ZERO),
            MediaKind::Image => item.photo_duration.unwrap_or(default_photo),
        };
        acc + len
    })
}

/// Post-trim project length: sum of effective durations.
pub fn edited_length<'a>(
    items: impl IntoIterator<Item = &'a MediaItem>,
    default_photo: Seconds,
) -> Seconds {
    items.into_iter().fold(Seconds::ZERO, |acc, item| {
        acc + effective_duration(item, default_photo)
    })
}
