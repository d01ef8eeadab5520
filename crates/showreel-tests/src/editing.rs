//! Integration tests for the editing side: clip carving, duration
//! aggregation, and playlist snapshots working together.

use showreel_core::{ClipId, Seconds};
use showreel_media::{ClipEdge, MediaLibrary};
use showreel_playback::{Playlist, StartMode};

// ── Helpers ────────────────────────────────────────────────────

fn secs(s: i64) -> Seconds {
    Seconds::from_secs(s)
}

fn carve(lib: &mut MediaLibrary, id: showreel_core::MediaId, start: i64, end: i64) -> ClipId {
    let item = lib.item_mut(id).unwrap();
    let pending = item.mark_clip_start(secs(start)).unwrap();
    item.mark_clip_end(pending, secs(end)).unwrap()
}

// ── Editing drives derived durations ───────────────────────────

#[test]
fn trimming_updates_edited_length_but_not_total() {
    let mut lib = MediaLibrary::new();
    let video = lib.add_video("main", "main.mp4").unwrap();
    let photo = lib.add_image("still", "still.jpg").unwrap();
    lib.set_video_duration(video, secs(10));

    // Untrimmed video and default 3s photo: both totals are 13.
    assert_eq!(lib.edited_length(), secs(13));
    assert_eq!(lib.total_length(), secs(13));

    carve(&mut lib, video, 0, 2);
    carve(&mut lib, video, 5, 8);

    assert_eq!(lib.effective_duration_of(video), Some(secs(5)));
    assert_eq!(lib.edited_length(), secs(8));
    assert_eq!(lib.total_length(), secs(13));

    lib.set_photo_duration(photo, Some(secs(1)));
    assert_eq!(lib.edited_length(), secs(6));
}

#[test]
fn overwrite_insertion_then_delete_rebuilds_totals() {
    let mut lib = MediaLibrary::new();
    let video = lib.add_video("main", "main.mp4").unwrap();
    lib.set_video_duration(video, secs(20));

    carve(&mut lib, video, 0, 5);
    carve(&mut lib, video, 10, 15);
    // Overlapping both: the survivors are removed whole.
    let big = carve(&mut lib, video, 4, 11);

    let item = lib.item(video).unwrap();
    assert_eq!(item.clips.len(), 1);
    assert_eq!(lib.effective_duration_of(video), Some(secs(7)));

    assert!(lib.item_mut(video).unwrap().delete_clip(big));
    // No clips left: the whole video counts again.
    assert_eq!(lib.effective_duration_of(video), Some(secs(20)));
}

#[test]
fn resize_overlap_is_flagged_not_merged() {
    let mut lib = MediaLibrary::new();
    let video = lib.add_video("main", "main.mp4").unwrap();
    lib.set_video_duration(video, secs(10));

    let left = carve(&mut lib, video, 0, 3);
    carve(&mut lib, video, 5, 8);

    let item = lib.item_mut(video).unwrap();
    assert!(item.resize_clip(left, ClipEdge::End, secs(6)));

    let item = lib.item(video).unwrap();
    assert_eq!(item.clips.len(), 2, "resize must not merge or remove");
    assert_eq!(item.overlapping_clip_ids().len(), 2);
    // Overlap double-counts in the edited length until the user resolves it.
    assert_eq!(lib.effective_duration_of(video), Some(secs(9)));
}

// ── Snapshots and the playback freeze ──────────────────────────

#[test]
fn snapshot_then_freeze_guards_a_session() {
    let mut lib = MediaLibrary::new();
    let video = lib.add_video("main", "main.mp4").unwrap();
    lib.set_video_duration(video, secs(10));
    carve(&mut lib, video, 2, 4);

    let playlist = Playlist::build(&lib, StartMode::FromStart).unwrap();
    lib.freeze();

    // Edits during the session are silently ignored...
    assert!(lib.item_mut(video).is_none());
    assert!(!lib.remove(video));
    assert!(lib.add_image("late", "late.jpg").is_none());

    // ...and the snapshot would not see them anyway.
    assert_eq!(playlist.len(), 1);
    assert_eq!(playlist.entry(0).effective, secs(2));

    lib.thaw();
    assert!(lib.item_mut(video).is_some());
}

#[test]
fn playlist_offsets_match_edited_prefix_sums() {
    let mut lib = MediaLibrary::new();
    let a = lib.add_video("a", "a.mp4").unwrap();
    let b = lib.add_image("b", "b.jpg").unwrap();
    let c = lib.add_video("c", "c.mp4").unwrap();
    lib.set_video_duration(a, secs(10));
    lib.set_video_duration(c, secs(6));
    carve(&mut lib, a, 0, 4);

    let playlist = Playlist::build(&lib, StartMode::FromStart).unwrap();
    assert_eq!(playlist.offset_of(0), Seconds::ZERO);
    assert_eq!(playlist.offset_of(1), secs(4));
    assert_eq!(playlist.offset_of(2), secs(7));
    assert_eq!(playlist.origin(), a);
    assert_eq!(playlist.entry(1).id, b);
}
