//! Clip ranges and the clip editing operations.
//!
//! A clip range is a sub-interval of one video's native timeline. Marking a
//! new range resolves overlaps destructively: every existing clip the new
//! range overlaps is removed whole, not trimmed. Resize and move do not
//! re-check overlap against siblings; [`MediaItem::overlapping_clip_ids`]
//! reports the resulting overlaps so a UI can flag them.

use serde::{Deserialize, Serialize};
use showreel_core::defaults::MIN_CLIP_LEN;
use showreel_core::{ClipId, Result, Seconds, ShowreelError};

use crate::item::MediaItem;

/// A sub-interval of a video's native timeline, `0 <= start < end <= duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRange {
    /// Unique clip ID
    pub id: ClipId,
    /// Source in point, seconds
    pub start: Seconds,
    /// Source out point, seconds
    pub end: Seconds,
}

impl ClipRange {
    /// Length of the range.
    #[inline]
    pub fn len(&self) -> Seconds {
        self.end - self.start
    }

    /// A zero-length range cannot be constructed through the editing
    /// operations; this exists for the usual emptiness convention.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check if two ranges overlap. Touching endpoints do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &ClipRange) -> bool {
        self.end > other.start && self.start < other.end
    }
}

/// Which edge of a clip a resize targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEdge {
    Start,
    End,
}

/// A pending start marker produced by [`MediaItem::mark_clip_start`].
///
/// Holds no reference into the clip set; dropping it discards the marker
/// with no side effects.
#[derive(Debug, Clone, Copy)]
pub struct PendingClip {
    /// Source time the start was marked at.
    pub start: Seconds,
}

impl MediaItem {
    /// Record a pending clip start at `source_time`. Does not touch the
    /// clip set. Returns `None` (silent no-op) for non-video items.
    pub fn mark_clip_start(&self, source_time: Seconds) -> Option<PendingClip> {
        if !self.is_video() {
            return None;
        }
        Some(PendingClip { start: source_time })
    }

    /// Close a pending marker at `source_time` and insert the new range.
    ///
    /// Fails with `InvalidRange` when `source_time <= pending.start`; the
    /// clip set is not mutated. Otherwise every existing clip the new range
    /// overlaps is removed whole (including clips that fully contain it),
    /// the new clip is inserted, and the set is re-sorted by start.
    pub fn mark_clip_end(&mut self, pending: PendingClip, source_time: Seconds) -> Result<ClipId> {
        let start = pending.start;
        // Clamp the out point to the measured duration so the range never
        // exits the source.
        let end = match self.duration {
            Some(native) if source_time > native => native,
            _ => source_time,
        };
        if end <= start {
            return Err(ShowreelError::InvalidRange { start, end });
        }

        let range = ClipRange {
            id: ClipId::new(),
            start,
            end,
        };
        self.clips.retain(|existing| !existing.overlaps(&range));
        let id = range.id;
        self.clips.push(range);
        self.clips.sort_by(|a, b| a.start.cmp(&b.start));
        Ok(id)
    }

    /// Remove one clip by identity. Returns whether it existed.
    pub fn delete_clip(&mut self, clip_id: ClipId) -> bool {
        let before = self.clips.len();
        self.clips.retain(|c| c.id != clip_id);
        self.clips.len() != before
    }

    /// Resize one edge of a clip, clamped so the clip keeps at least
    /// `MIN_CLIP_LEN` and stays inside the source.
    ///
    /// Does not re-check overlap against sibling clips.
    pub fn resize_clip(&mut self, clip_id: ClipId, edge: ClipEdge, new_time: Seconds) -> bool {
        let native = self.duration;
        let Some(clip) = self.clips.iter_mut().find(|c| c.id == clip_id) else {
            return false;
        };
        match edge {
            ClipEdge::Start => {
                clip.start = new_time.clamp(Seconds::ZERO, clip.end - MIN_CLIP_LEN);
            }
            ClipEdge::End => {
                let lo = clip.start + MIN_CLIP_LEN;
                let hi = match native {
                    Some(d) => d,
                    // Duration not measured yet: only the lower clamp applies.
                    None => {
                        if new_time < lo {
                            lo
                        } else {
                            new_time
                        }
                    }
                };
                clip.end = new_time.clamp(lo, hi);
            }
        }
        true
    }

    /// Move a clip to a new start, preserving its length. The start is
    /// clamped into `[0, duration - len]` so the clip never exits the
    /// source. Does not re-check overlap against sibling clips.
    pub fn move_clip(&mut self, clip_id: ClipId, new_start: Seconds) -> bool {
        let native = self.duration;
        let Some(clip) = self.clips.iter_mut().find(|c| c.id == clip_id) else {
            return false;
        };
        let len = clip.len();
        let hi = match native {
            Some(d) => d.saturating_sub(len),
            None => new_start, // no upper clamp without a measured duration
        };
        let start = new_start.clamp(Seconds::ZERO, hi);
        clip.start = start;
        clip.end = start + len;
        // Moving can reorder the set; keep it ascending by start.
        self.clips.sort_by(|a, b| a.start.cmp(&b.start));
        true
    }

    /// Ids of clips that currently overlap a sibling. Only resize/move can
    /// produce these; callers should surface them as a distinct display
    /// state rather than merging.
    pub fn overlapping_clip_ids(&self) -> Vec<ClipId> {
        let mut out = Vec::new();
        for (i, a) in self.clips.iter().enumerate() {
            let collides = self
                .clips
                .iter()
                .enumerate()
                .any(|(j, b)| i != j && a.overlaps(b));
            if collides {
                out.push(a.id);
            }
        }
        out
    }
}
