//! Integration tests for the playback sequencer.
//!
//! Every scenario drives a real sequencer with the manual scheduler and
//! the recording host, so timers fire exactly when the test says so.

use crossbeam_channel::Receiver;
use showreel_core::{MediaId, Seconds};
use showreel_media::MediaLibrary;
use showreel_playback::{
    ManualScheduler, PlayState, Playlist, PreviewSequencer, SequencerEvent, StartMode,
    TimerPurpose,
};
use std::time::Duration;

use crate::support::{HostCall, MockHost};

type Sequencer = PreviewSequencer<MockHost, ManualScheduler>;

// ── Helpers ────────────────────────────────────────────────────

fn secs(s: i64) -> Seconds {
    Seconds::from_secs(s)
}

fn carve(lib: &mut MediaLibrary, id: MediaId, start: i64, end: i64) {
    let item = lib.item_mut(id).unwrap();
    let pending = item.mark_clip_start(secs(start)).unwrap();
    item.mark_clip_end(pending, secs(end)).unwrap();
}

struct Rig {
    seq: Sequencer,
    host: MockHost,
    sched: ManualScheduler,
    events: Receiver<SequencerEvent>,
}

fn rig(lib: &MediaLibrary, mode: StartMode) -> Rig {
    let host = MockHost::new();
    let sched = ManualScheduler::new();
    let (mut seq, events) = PreviewSequencer::new(host.clone(), sched.clone());
    seq.start(Playlist::build(lib, mode).unwrap());
    Rig {
        seq,
        host,
        sched,
        events,
    }
}

fn drain(events: &Receiver<SequencerEvent>) -> Vec<SequencerEvent> {
    events.try_iter().collect()
}

fn globals(events: &[SequencerEvent]) -> Vec<Seconds> {
    events
        .iter()
        .filter_map(|e| match e {
            SequencerEvent::TimeAdvanced { global } => Some(*global),
            _ => None,
        })
        .collect()
}

fn item_changes(events: &[SequencerEvent]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match e {
            SequencerEvent::ItemChanged { index, .. } => Some(*index),
            _ => None,
        })
        .collect()
}

/// Fire the pending advance-delay timer and report the next source ready.
fn complete_advance(r: &mut Rig) {
    let token = r.sched.fire_next().expect("advance timer pending");
    r.seq.on_timer(token);
    r.seq.on_source_ready();
}

// ── Full-session walkthroughs ──────────────────────────────────

#[test]
fn clip_walk_maps_local_time_to_global_time() {
    let mut lib = MediaLibrary::new();
    let a = lib.add_video("a", "a.mp4").unwrap();
    let b = lib.add_video("b", "b.mp4").unwrap();
    lib.set_video_duration(a, secs(10));
    lib.set_video_duration(b, secs(12));
    carve(&mut lib, b, 2, 5);
    carve(&mut lib, b, 7, 9);

    let mut r = rig(&lib, StartMode::FromStart);
    r.seq.on_source_ready();
    assert_eq!(
        r.host.take_calls(),
        vec![HostCall::LoadVideo(a), HostCall::Play]
    );

    // Untrimmed first video: global time is just local time.
    r.seq.on_time_update(secs(4));
    assert_eq!(globals(&drain(&r.events)).last(), Some(&secs(4)));

    // Within END_EPSILON of the native end: advance.
    r.seq.on_time_update(Seconds::from_secs_f64(9.96));
    assert_eq!(r.seq.state(), PlayState::Loading { index: 1 });
    complete_advance(&mut r);

    // Second video opens on its first clip.
    assert_eq!(
        r.seq.state(),
        PlayState::PlayingVideo {
            index: 1,
            clip: Some(0)
        }
    );
    let calls = r.host.take_calls();
    assert!(calls.contains(&HostCall::LoadVideo(b)));
    assert!(calls.contains(&HostCall::Seek(secs(2))));

    // Mid-clip: global = effective(a) + time into clip 0.
    r.seq.on_time_update(secs(3));
    assert_eq!(globals(&drain(&r.events)).last(), Some(&secs(11)));

    // Clip 0 boundary: seek to clip 1; global at that instant is
    // effective(a) + len(clip 0) = 10 + 3.
    r.seq.on_time_update(secs(5));
    assert_eq!(
        r.seq.state(),
        PlayState::PlayingVideo {
            index: 1,
            clip: Some(1)
        }
    );
    assert!(r.host.take_calls().contains(&HostCall::Seek(secs(7))));
    assert_eq!(globals(&drain(&r.events)).last(), Some(&secs(13)));

    // Start of clip 1 maps to the same global instant.
    r.seq.on_time_update(secs(7));
    assert_eq!(globals(&drain(&r.events)).last(), Some(&secs(13)));

    // Last clip boundary: the playlist is done.
    r.seq.on_time_update(secs(9));
    let tail = drain(&r.events);
    assert_eq!(globals(&tail).last(), Some(&secs(15)));
    assert!(tail.contains(&SequencerEvent::Ended));
    assert!(tail.contains(&SequencerEvent::Stopped { return_to: a }));
    assert_eq!(r.seq.state(), PlayState::Idle);
    assert!(r.host.take_calls().contains(&HostCall::Detach));
}

#[test]
fn photo_dwell_timer_drives_the_photo_transition() {
    let mut lib = MediaLibrary::new();
    let a = lib.add_image("a", "a.jpg").unwrap();
    let b = lib.add_video("b", "b.mp4").unwrap();
    lib.set_video_duration(b, secs(6));

    let mut r = rig(&lib, StartMode::FromStart);
    assert_eq!(r.host.take_calls(), vec![HostCall::ShowImage(a)]);

    r.seq.on_source_ready();
    assert_eq!(r.seq.state(), PlayState::ShowingPhoto { index: 0 });
    // Default dwell is 3s of wall clock.
    assert_eq!(r.sched.next_delay(), Some(Duration::from_secs(3)));
    let token = r.sched.peek_next().unwrap();
    assert!(matches!(
        token.purpose,
        TimerPurpose::PhotoDwell { index: 0 }
    ));

    let fired = r.sched.fire_next().unwrap();
    r.seq.on_timer(fired);
    assert_eq!(r.seq.state(), PlayState::Loading { index: 1 });
    complete_advance(&mut r);

    // The video after the photo starts at the photo's effective duration.
    r.seq.on_time_update(secs(1));
    assert_eq!(globals(&drain(&r.events)).last(), Some(&secs(4)));
}

// ── Stop semantics ─────────────────────────────────────────────

#[test]
fn stop_before_photo_timer_fires_makes_the_timer_a_noop() {
    let mut lib = MediaLibrary::new();
    let a = lib.add_image("a", "a.jpg").unwrap();
    lib.add_image("b", "b.jpg").unwrap();

    let mut r = rig(&lib, StartMode::FromStart);
    r.seq.on_source_ready();
    let token = r.sched.peek_next().expect("dwell timer scheduled");

    r.seq.stop();
    assert_eq!(r.seq.state(), PlayState::Idle);
    assert_eq!(r.sched.pending_count(), 0, "stop cancels the dwell timer");
    let events = drain(&r.events);
    assert!(events.contains(&SequencerEvent::Stopped { return_to: a }));
    assert!(r.host.take_calls().contains(&HostCall::Detach));

    // The captured token fires late anyway: guaranteed no-op.
    r.seq.on_timer(token);
    assert_eq!(r.seq.state(), PlayState::Idle);
    assert!(drain(&r.events).is_empty());
    assert!(r.host.take_calls().is_empty());
}

#[test]
fn stop_mid_advance_cancels_the_pending_load() {
    let mut lib = MediaLibrary::new();
    let a = lib.add_video("a", "a.mp4").unwrap();
    lib.set_video_duration(a, secs(4));
    let b = lib.add_video("b", "b.mp4").unwrap();
    lib.set_video_duration(b, secs(4));

    let mut r = rig(&lib, StartMode::FromStart);
    r.seq.on_source_ready();
    r.seq.on_time_update(secs(4));
    assert_eq!(r.seq.state(), PlayState::Loading { index: 1 });
    assert_eq!(r.sched.pending_count(), 1);

    r.seq.stop();
    assert_eq!(r.seq.state(), PlayState::Idle);
    assert_eq!(r.sched.pending_count(), 0);
    assert!(drain(&r.events).contains(&SequencerEvent::Stopped { return_to: a }));
}

// ── Advance races ──────────────────────────────────────────────

#[test]
fn overlapping_advance_triggers_increment_exactly_once() {
    let mut lib = MediaLibrary::new();
    let a = lib.add_video("a", "a.mp4").unwrap();
    lib.set_video_duration(a, secs(10));
    let b = lib.add_video("b", "b.mp4").unwrap();
    lib.set_video_duration(b, secs(10));

    let mut r = rig(&lib, StartMode::FromStart);
    r.seq.on_source_ready();
    drain(&r.events);

    // Boundary tick and a racing ended notification.
    r.seq.on_time_update(Seconds::from_secs_f64(9.97));
    r.seq.on_source_ended();
    r.seq.on_time_update(Seconds::from_secs_f64(9.99));

    assert_eq!(r.seq.state(), PlayState::Loading { index: 1 });
    assert_eq!(r.sched.pending_count(), 1, "one advance, one load timer");

    complete_advance(&mut r);
    let all = drain(&r.events);
    assert_eq!(item_changes(&all), vec![1], "exactly one index increment");
    assert_eq!(r.seq.state(), PlayState::PlayingVideo { index: 1, clip: None });
}

// ── Failure recovery ───────────────────────────────────────────

#[test]
fn image_load_failure_advances_instead_of_failing() {
    let mut lib = MediaLibrary::new();
    lib.add_image("a", "a.jpg").unwrap();
    let b = lib.add_video("b", "b.mp4").unwrap();
    lib.set_video_duration(b, secs(6));

    let mut r = rig(&lib, StartMode::FromStart);
    r.seq.on_source_failed("image fetch failed");
    assert_eq!(r.seq.state(), PlayState::Loading { index: 1 });
    complete_advance(&mut r);

    // The skipped photo still occupies its slice of the global timeline.
    r.seq.on_time_update(secs(2));
    assert_eq!(globals(&drain(&r.events)).last(), Some(&secs(5)));
}

#[test]
fn failure_while_loading_skips_the_unloadable_entry() {
    let mut lib = MediaLibrary::new();
    lib.add_image("a", "a.jpg").unwrap();
    let b = lib.add_video("b", "b.mp4").unwrap();
    lib.set_video_duration(b, secs(6));
    let c = lib.add_image("c", "c.jpg").unwrap();

    let mut r = rig(&lib, StartMode::FromStart);
    r.seq.on_source_ready();
    let dwell = r.sched.fire_next().expect("photo dwell timer");
    r.seq.on_timer(dwell);
    assert_eq!(r.seq.state(), PlayState::Loading { index: 1 });

    // Entry b never becomes ready; the advance guard must not wedge.
    let token = r.sched.fire_next().expect("load timer");
    r.seq.on_timer(token);
    r.seq.on_source_failed("decoder refused the file");
    assert_eq!(r.seq.state(), PlayState::Loading { index: 2 });

    complete_advance(&mut r);
    assert_eq!(r.seq.state(), PlayState::ShowingPhoto { index: 2 });
    let shown: Vec<_> = r
        .host
        .take_calls()
        .into_iter()
        .filter(|c| matches!(c, HostCall::ShowImage(_)))
        .collect();
    assert_eq!(shown.last(), Some(&HostCall::ShowImage(c)));
}

#[test]
fn unmeasured_video_is_skipped_not_fatal() {
    let mut lib = MediaLibrary::new();
    lib.add_video("ghost", "ghost.mp4").unwrap(); // duration never probed
    let b = lib.add_image("b", "b.jpg").unwrap();

    let mut r = rig(&lib, StartMode::FromStart);
    r.seq.on_source_ready();
    assert_eq!(r.seq.state(), PlayState::Loading { index: 1 });

    complete_advance(&mut r);
    assert_eq!(r.seq.state(), PlayState::ShowingPhoto { index: 1 });

    // Zero effective duration: the photo starts at global zero.
    let all = drain(&r.events);
    assert_eq!(globals(&all).last(), Some(&Seconds::ZERO));
    assert!(r.host.calls().contains(&HostCall::ShowImage(b)));
}

// ── End of playlist ────────────────────────────────────────────

#[test]
fn finishing_returns_to_the_originally_selected_item() {
    let mut lib = MediaLibrary::new();
    lib.add_video("a", "a.mp4").unwrap();
    let b = lib.add_image("b", "b.jpg").unwrap();
    let c = lib.add_video("c", "c.mp4").unwrap();
    lib.set_video_duration(c, secs(4));

    // Start from the photo: the playlist is [b, c].
    let mut r = rig(&lib, StartMode::FromSelected(b));
    r.seq.on_source_ready();
    let token = r.sched.fire_next().expect("dwell timer");
    r.seq.on_timer(token);
    complete_advance(&mut r);

    r.seq.on_time_update(secs(4));
    let all = drain(&r.events);
    assert!(all.contains(&SequencerEvent::Ended));
    assert!(all.contains(&SequencerEvent::Stopped { return_to: b }));
    assert_eq!(r.seq.state(), PlayState::Idle);
}

#[test]
fn item_changed_carries_caption_state() {
    let mut lib = MediaLibrary::new();
    let a = lib.add_image("a", "a.jpg").unwrap();
    lib.set_caption(a, "First light");
    lib.set_show_caption(a, true);

    let r = rig(&lib, StartMode::FromStart);
    let events = drain(&r.events);
    match &events[0] {
        SequencerEvent::ItemChanged {
            index,
            id,
            caption,
            show_caption,
        } => {
            assert_eq!(*index, 0);
            assert_eq!(*id, a);
            assert_eq!(caption, "First light");
            assert!(*show_caption);
        }
        other => panic!("expected ItemChanged first, got {other:?}"),
    }
}
