//! Showreel - Sequence player demo
//!
//! Builds a small demo project and plays it end to end against a simulated
//! media source, logging sequencer events as they happen. The source clock
//! runs faster than wall time so the demo finishes in a few seconds.

use anyhow::Result;
use crossbeam_channel::{select, unbounded};
use parking_lot::Mutex;
use showreel_core::Seconds;
use showreel_media::MediaLibrary;
use showreel_playback::{
    Playlist, PlaylistEntry, PreviewSequencer, SequencerEvent, SourceHost, StartMode,
    WallClockScheduler,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// How much faster than wall time the simulated source clock runs.
const SIM_SPEED: i64 = 8;
/// Event loop tick.
const TICK: Duration = Duration::from_millis(20);

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Showreel demo starting...");

    // Optional first argument: default photo dwell in seconds.
    let dwell = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f64>().ok())
        .map(Seconds::from_secs_f64)
        .unwrap_or(Seconds::from_secs(1));

    let mut library = build_demo_library(dwell);
    info!(
        total = %library.total_length(),
        edited = %library.edited_length(),
        "demo project assembled"
    );

    run_session(&mut library)?;

    info!("Showreel demo finished");
    Ok(())
}

/// Two trimmed videos around a captioned photo.
fn build_demo_library(dwell: Seconds) -> MediaLibrary {
    let mut library = MediaLibrary::new();
    library.set_default_photo_duration(dwell);

    let intro = library.add_video("Intro", "media/intro.mp4").unwrap();
    let photo = library.add_image("Sunset", "media/sunset.jpg").unwrap();
    let outro = library.add_video("Outro", "media/outro.mp4").unwrap();

    library.set_video_duration(intro, Seconds::from_secs(8));
    library.set_video_duration(outro, Seconds::from_secs(6));
    library.set_caption(photo, "Sunset over the bay");
    library.set_show_caption(photo, true);

    // Keep two short cuts of the intro and the middle of the outro.
    {
        let item = library.item_mut(intro).unwrap();
        let pending = item.mark_clip_start(Seconds::from_secs(1)).unwrap();
        item.mark_clip_end(pending, Seconds::from_secs(2)).unwrap();
        let pending = item.mark_clip_start(Seconds::from_secs(5)).unwrap();
        item.mark_clip_end(pending, Seconds::from_secs(7)).unwrap();
    }
    {
        let item = library.item_mut(outro).unwrap();
        let pending = item.mark_clip_start(Seconds::from_secs(2)).unwrap();
        item.mark_clip_end(pending, Seconds::from_secs(4)).unwrap();
    }

    library
}

fn run_session(library: &mut MediaLibrary) -> Result<()> {
    let playlist = Playlist::build(library, StartMode::FromStart)?;
    library.freeze();

    let (timer_tx, timer_rx) = unbounded();
    let scheduler = WallClockScheduler::spawn(timer_tx);
    let host = SimulatedHost::new();
    let clock = host.clone();
    let (mut sequencer, events) = PreviewSequencer::new(host, scheduler);

    sequencer.start(playlist);

    let step = Seconds::from_millis(TICK.as_millis() as i64 * SIM_SPEED);
    'session: loop {
        select! {
            recv(timer_rx) -> token => {
                if let Ok(token) = token {
                    sequencer.on_timer(token);
                }
            }
            default(TICK) => {
                for signal in clock.poll(step) {
                    match signal {
                        HostSignal::Ready => sequencer.on_source_ready(),
                        HostSignal::Time(local) => sequencer.on_time_update(local),
                    }
                }
            }
        }

        for event in events.try_iter() {
            match event {
                SequencerEvent::ItemChanged {
                    index,
                    id,
                    caption,
                    show_caption,
                } => {
                    if show_caption {
                        info!(index, %id, caption = %caption, "now playing");
                    } else {
                        info!(index, %id, "now playing");
                    }
                }
                SequencerEvent::TimeAdvanced { global } => {
                    debug!(global = %global, "playhead");
                }
                SequencerEvent::Ended => info!("playlist ended"),
                SequencerEvent::Stopped { return_to } => {
                    info!(%return_to, "session over, returning to selection");
                    break 'session;
                }
            }
        }
    }

    library.thaw();
    Ok(())
}

// ── Simulated source host ────────────────────────────────────────

enum HostSignal {
    Ready,
    Time(Seconds),
}

struct SimSource {
    local: Seconds,
    playing: bool,
    ready_pending: bool,
}

/// Fake media machinery: attaching a source reports ready on the next
/// tick, and an attached playing source advances its local clock by the
/// poll step. Clones share the same state, so the event loop keeps one
/// while the sequencer owns the other.
#[derive(Clone)]
struct SimulatedHost {
    state: Arc<Mutex<Option<SimSource>>>,
}

impl SimulatedHost {
    fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(None)),
        }
    }

    fn poll(&self, step: Seconds) -> Vec<HostSignal> {
        let mut state = self.state.lock();
        let Some(source) = state.as_mut() else {
            return Vec::new();
        };
        if source.ready_pending {
            source.ready_pending = false;
            return vec![HostSignal::Ready];
        }
        if source.playing {
            source.local = source.local + step;
            return vec![HostSignal::Time(source.local)];
        }
        Vec::new()
    }
}

impl SourceHost for SimulatedHost {
    fn load_video(&mut self, _entry: &PlaylistEntry) {
        *self.state.lock() = Some(SimSource {
            local: Seconds::ZERO,
            playing: false,
            ready_pending: true,
        });
    }

    fn show_image(&mut self, _entry: &PlaylistEntry) {
        *self.state.lock() = Some(SimSource {
            local: Seconds::ZERO,
            playing: false,
            ready_pending: true,
        });
    }

    fn seek(&mut self, to: Seconds) {
        if let Some(source) = self.state.lock().as_mut() {
            source.local = to;
        }
    }

    fn play(&mut self) {
        if let Some(source) = self.state.lock().as_mut() {
            source.playing = true;
        }
    }

    fn pause(&mut self) {
        if let Some(source) = self.state.lock().as_mut() {
            source.playing = false;
        }
    }

    fn detach(&mut self) {
        *self.state.lock() = None;
    }
}
