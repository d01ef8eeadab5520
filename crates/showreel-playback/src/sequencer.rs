//! The playback sequencer.
//!
//! A state machine that walks a playlist snapshot, walks clips within the
//! current video, drives photo dwell timers, and maps source-local time to
//! one monotonically increasing global timeline time.
//!
//! Race discipline:
//! - every scheduled callback carries the generation it was scheduled
//!   under and is a no-op once the generation moves on (stop/restart);
//! - advancing to the next entry is guarded by a compare-and-set flag, so
//!   a second trigger observed while one advance is in flight is dropped,
//!   not queued;
//! - `stop()` bumps the generation before any cleanup I/O runs.

use crossbeam_channel::{unbounded, Receiver, Sender};
use showreel_core::defaults::{ADVANCE_DELAY, END_EPSILON};
use showreel_core::{MediaId, Seconds};
use showreel_media::MediaKind;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::playlist::Playlist;
use crate::scheduler::{DelayScheduler, TimerId, TimerPurpose, TimerToken};
use crate::source::SourceHost;

/// Where the sequencer currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    /// No playlist attached.
    Idle,
    /// Waiting for the host to prepare entry `index`.
    Loading { index: usize },
    /// A video entry is playing. `clip` is the active clip index when the
    /// entry has a clip set.
    PlayingVideo { index: usize, clip: Option<usize> },
    /// A photo is on screen, its dwell timer pending.
    ShowingPhoto { index: usize },
    /// Transient: a stop request is being serviced. Never observable from
    /// outside `stop()`.
    Stopping,
}

/// Events the sequencer emits back to the surrounding UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    /// The active playlist entry changed. Carries what the caption
    /// renderer needs for the new entry.
    ItemChanged {
        index: usize,
        id: MediaId,
        caption: String,
        show_caption: bool,
    },
    /// The global playhead moved.
    TimeAdvanced { global: Seconds },
    /// The playlist ran to its natural end.
    Ended,
    /// Playback is over (manual stop or natural end); the UI should return
    /// to a non-playback view of the originally-selected item.
    Stopped { return_to: MediaId },
}

/// The playback sequencer. One logical timeline at a time; create it once
/// and reuse it across sessions.
pub struct PreviewSequencer<H: SourceHost, S: DelayScheduler> {
    host: H,
    scheduler: S,
    events: Sender<SequencerEvent>,
    state: PlayState,
    playlist: Option<Playlist>,
    /// Bumped on every stop/restart; scheduled callbacks carry the value
    /// they were created under.
    generation: u64,
    /// Compare-and-set guard: true from an advance decision until the next
    /// entry is ready (or the session ends).
    advancing: bool,
    /// Global time at which the current entry began: the sum of completed
    /// entries' effective durations.
    prefix: Seconds,
    pending_timer: Option<TimerId>,
}

impl<H: SourceHost, S: DelayScheduler> PreviewSequencer<H, S> {
    /// Create a sequencer and the receiving end of its event stream.
    pub fn new(host: H, scheduler: S) -> (Self, Receiver<SequencerEvent>) {
        let (events, rx) = unbounded();
        (
            Self {
                host,
                scheduler,
                events,
                state: PlayState::Idle,
                playlist: None,
                generation: 0,
                advancing: false,
                prefix: Seconds::ZERO,
                pending_timer: None,
            },
            rx,
        )
    }

    /// Current state.
    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Whether a session is in progress.
    pub fn is_active(&self) -> bool {
        self.state != PlayState::Idle
    }

    /// Index of the entry the sequencer is currently on, if any.
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            PlayState::Loading { index }
            | PlayState::PlayingVideo { index, .. }
            | PlayState::ShowingPhoto { index } => Some(index),
            PlayState::Idle | PlayState::Stopping => None,
        }
    }

    // ── Session control ─────────────────────────────────────────

    /// Start a session over a playlist snapshot. Ignored (with a warning)
    /// while a session is already active.
    pub fn start(&mut self, playlist: Playlist) {
        if self.is_active() {
            warn!("start ignored: a playback session is already active");
            return;
        }
        info!(entries = playlist.len(), "playback session starting");
        self.generation += 1;
        self.prefix = Seconds::ZERO;
        self.advancing = false;
        self.playlist = Some(playlist);
        self.begin_load(0);
    }

    /// Stop the session from any state. Safe to call when idle.
    ///
    /// Ordering matters: the generation bump invalidates every scheduled
    /// callback before the timer cancellation and source teardown run, so
    /// a late-firing photo timer can never resurrect playback.
    pub fn stop(&mut self) {
        if self.state == PlayState::Idle {
            return;
        }
        self.state = PlayState::Stopping;
        self.generation += 1;
        if let Some(id) = self.pending_timer.take() {
            self.scheduler.cancel(id);
        }
        self.host.detach();
        let return_to = self.playlist.as_ref().map(Playlist::origin);
        self.reset();
        info!("playback session stopped");
        if let Some(id) = return_to {
            self.emit(SequencerEvent::Stopped { return_to: id });
        }
    }

    // ── Host event intake ───────────────────────────────────────

    /// The host finished preparing the source requested by the last
    /// `load_video`/`show_image`.
    pub fn on_source_ready(&mut self) {
        let PlayState::Loading { index } = self.state else {
            trace!("source ready ignored outside Loading");
            return;
        };
        // The entry we were advancing toward has arrived.
        self.advancing = false;

        let (kind, first_clip_start, measured, effective) = {
            let entry = self.playlist_ref().entry(index);
            (
                entry.kind,
                entry.clips.first().map(|c| c.start),
                entry.duration.is_some(),
                entry.effective,
            )
        };
        match kind {
            MediaKind::Video => {
                if let Some(at) = first_clip_start {
                    self.state = PlayState::PlayingVideo {
                        index,
                        clip: Some(0),
                    };
                    self.host.seek(at);
                    self.host.play();
                } else if !measured {
                    // Unmeasured video: nothing playable, skip it.
                    debug!(index, "video has no measured duration, skipping");
                    self.advance_to_next();
                } else {
                    self.state = PlayState::PlayingVideo { index, clip: None };
                    self.host.play();
                }
            }
            MediaKind::Image => {
                let dwell = Duration::from_secs_f64(effective.to_secs_f64().max(0.0));
                self.state = PlayState::ShowingPhoto { index };
                let global = self.prefix;
                self.emit(SequencerEvent::TimeAdvanced { global });
                let token = TimerToken {
                    generation: self.generation,
                    purpose: TimerPurpose::PhotoDwell { index },
                };
                let id = self.scheduler.schedule(dwell, token);
                self.pending_timer = Some(id);
            }
        }
    }

    /// The video source reported its current source-local time.
    pub fn on_time_update(&mut self, local: Seconds) {
        let PlayState::PlayingVideo { index, clip } = self.state else {
            trace!("time update ignored outside PlayingVideo");
            return;
        };

        enum Boundary {
            None,
            NextClip { clip: usize, at: Seconds },
            NextItem,
        }

        let entry = self.playlist_ref().entry(index);
        let (global, boundary) = match clip {
            Some(ci) => {
                let active = &entry.clips[ci];
                let preceding = entry.clips[..ci]
                    .iter()
                    .fold(Seconds::ZERO, |acc, c| acc + c.len());
                let within = local.saturating_sub(active.start).clamp(Seconds::ZERO, active.len());
                let boundary = if local >= active.end {
                    match entry.clips.get(ci + 1) {
                        Some(next) => Boundary::NextClip {
                            clip: ci + 1,
                            at: next.start,
                        },
                        None => Boundary::NextItem,
                    }
                } else {
                    Boundary::None
                };
                (self.prefix + preceding + within, boundary)
            }
            None => {
                // Untrimmed video: play through to the native end.
                let native = entry.duration.unwrap_or(Seconds::ZERO);
                let boundary = if local >= native.saturating_sub(END_EPSILON) {
                    Boundary::NextItem
                } else {
                    Boundary::None
                };
                (self.prefix + local.clamp(Seconds::ZERO, native), boundary)
            }
        };

        self.emit(SequencerEvent::TimeAdvanced { global });
        match boundary {
            Boundary::None => {}
            Boundary::NextClip { clip, at } => {
                debug!(index, clip, "clip boundary, seeking to next clip");
                self.state = PlayState::PlayingVideo {
                    index,
                    clip: Some(clip),
                };
                self.host.seek(at);
            }
            Boundary::NextItem => self.advance_to_next(),
        }
    }

    /// The video source reached its natural end.
    pub fn on_source_ended(&mut self) {
        match self.state {
            PlayState::PlayingVideo { .. } => self.advance_to_next(),
            _ => trace!("source ended ignored outside PlayingVideo"),
        }
    }

    /// The source (video or image) failed to load or died mid-play.
    /// Recovered by skipping to the next entry; never fatal.
    pub fn on_source_failed(&mut self, reason: &str) {
        match self.state {
            PlayState::Loading { index }
            | PlayState::PlayingVideo { index, .. }
            | PlayState::ShowingPhoto { index } => {
                warn!(index, reason, "source failed, skipping entry");
                if let Some(id) = self.pending_timer.take() {
                    self.scheduler.cancel(id);
                }
                // The failed entry will never become ready; the in-flight
                // guard must not block the recovery advance.
                self.advancing = false;
                self.advance_to_next();
            }
            PlayState::Idle | PlayState::Stopping => {
                trace!("source failure ignored while inactive");
            }
        }
    }

    /// A scheduler timer fired. Stale-generation tokens are no-ops.
    pub fn on_timer(&mut self, token: TimerToken) {
        if token.generation != self.generation {
            trace!(?token, "stale timer ignored");
            return;
        }
        self.pending_timer = None;
        match token.purpose {
            TimerPurpose::PhotoDwell { index } => {
                if self.state == (PlayState::ShowingPhoto { index }) {
                    self.advance_to_next();
                } else {
                    trace!(index, "photo dwell timer ignored, state moved on");
                }
            }
            TimerPurpose::BeginLoad { index } => {
                if self.state == (PlayState::Loading { index }) {
                    self.begin_load(index);
                } else {
                    trace!(index, "load timer ignored, state moved on");
                }
            }
        }
    }

    // ── Transitions ─────────────────────────────────────────────

    /// Emit `ItemChanged` for `index` and ask the host for its source.
    fn begin_load(&mut self, index: usize) {
        self.state = PlayState::Loading { index };
        let entry = self.playlist_ref().entry(index).clone();
        self.emit(SequencerEvent::ItemChanged {
            index,
            id: entry.id,
            caption: entry.caption.clone(),
            show_caption: entry.show_caption,
        });
        match entry.kind {
            MediaKind::Video => self.host.load_video(&entry),
            MediaKind::Image => self.host.show_image(&entry),
        }
    }

    /// The single boundary transition: move past the current entry.
    ///
    /// Idempotent under concurrent triggers: the first caller wins, later
    /// callers observe `advancing` and are dropped. The actual source swap
    /// is decoupled from this decision by `ADVANCE_DELAY` through the
    /// scheduler, so it never runs inside a source callback.
    fn advance_to_next(&mut self) {
        if self.advancing {
            debug!("advance dropped: another advance is in flight");
            return;
        }
        let Some(index) = self.current_index() else {
            return;
        };
        self.advancing = true;

        let playlist = self.playlist_ref();
        let effective = playlist.entry(index).effective;
        let last = index + 1 >= playlist.len();
        self.prefix = self.prefix + effective;
        self.host.pause();

        if last {
            self.finish();
            return;
        }

        let next = index + 1;
        self.state = PlayState::Loading { index: next };
        let token = TimerToken {
            generation: self.generation,
            purpose: TimerPurpose::BeginLoad { index: next },
        };
        let id = self.scheduler.schedule(ADVANCE_DELAY, token);
        self.pending_timer = Some(id);
    }

    /// Natural end of the playlist. Equivalent to a manual stop, plus the
    /// `Ended` event.
    fn finish(&mut self) {
        info!("playlist finished");
        self.emit(SequencerEvent::Ended);
        self.generation += 1;
        if let Some(id) = self.pending_timer.take() {
            self.scheduler.cancel(id);
        }
        self.host.detach();
        let return_to = self.playlist.as_ref().map(Playlist::origin);
        self.reset();
        if let Some(id) = return_to {
            self.emit(SequencerEvent::Stopped { return_to: id });
        }
    }

    fn reset(&mut self) {
        self.state = PlayState::Idle;
        self.playlist = None;
        self.prefix = Seconds::ZERO;
        self.advancing = false;
    }

    fn playlist_ref(&self) -> &Playlist {
        self.playlist
            .as_ref()
            .expect("playlist attached for the lifetime of a session")
    }

    fn emit(&self, event: SequencerEvent) {
        // A dropped receiver means nobody is watching; playback goes on.
        let _ = self.events.send(event);
    }
}
