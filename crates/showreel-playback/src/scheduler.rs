//! Injectable delay scheduling.
//!
//! The sequencer never touches the wall clock directly: it schedules
//! tokens through [`DelayScheduler`] and receives them back through
//! [`PreviewSequencer::on_timer`]. Tokens carry the generation they were
//! scheduled under, so a token from a stopped session is a guaranteed
//! no-op at fire time.
//!
//! [`PreviewSequencer::on_timer`]: crate::sequencer::PreviewSequencer::on_timer

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Handle to a scheduled timer, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

/// What a timer firing means to the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPurpose {
    /// A photo's dwell time elapsed; advance past playlist entry `index`.
    PhotoDwell { index: usize },
    /// The short advance delay elapsed; begin loading entry `index`.
    BeginLoad { index: usize },
}

/// A scheduled callback's payload: the purpose plus the generation it was
/// scheduled under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken {
    pub generation: u64,
    pub purpose: TimerPurpose,
}

/// Schedule-after-delay / cancel-by-handle capability.
pub trait DelayScheduler {
    /// Schedule `token` to be delivered after `delay`.
    fn schedule(&mut self, delay: Duration, token: TimerToken) -> TimerId;

    /// Cancel a pending timer. Cancelling an already-fired or unknown
    /// timer is a no-op.
    fn cancel(&mut self, id: TimerId);
}

// ── Manual scheduler (deterministic test double) ─────────────────

#[derive(Debug)]
struct ManualInner {
    next_id: u64,
    pending: Vec<(TimerId, Duration, TimerToken)>,
}

/// A scheduler that never fires on its own: tests pop tokens out of it and
/// feed them to the sequencer by hand. Clones share the same pending set,
/// so a test can keep a handle while the sequencer owns the other.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualInner {
                next_id: 0,
                pending: Vec::new(),
            })),
        }
    }

    /// Number of timers currently pending.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Delay of the oldest pending timer.
    pub fn next_delay(&self) -> Option<Duration> {
        self.inner.lock().pending.first().map(|(_, d, _)| *d)
    }

    /// Pop the oldest pending timer as if its delay had elapsed.
    pub fn fire_next(&self) -> Option<TimerToken> {
        let mut inner = self.inner.lock();
        if inner.pending.is_empty() {
            None
        } else {
            let (_, _, token) = inner.pending.remove(0);
            Some(token)
        }
    }

    /// Peek the oldest pending token without consuming it.
    pub fn peek_next(&self) -> Option<TimerToken> {
        self.inner.lock().pending.first().map(|(_, _, t)| *t)
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayScheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, token: TimerToken) -> TimerId {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = TimerId(inner.next_id);
        inner.pending.push((id, delay, token));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.inner.lock().pending.retain(|(tid, _, _)| *tid != id);
    }
}

// ── Wall-clock scheduler ─────────────────────────────────────────

enum Cmd {
    Schedule {
        id: TimerId,
        due: Instant,
        token: TimerToken,
    },
    Cancel(TimerId),
}

/// Real scheduler backed by a worker thread. Fired tokens are delivered on
/// the channel given at spawn time; the surrounding event loop forwards
/// them to the sequencer. The worker exits when the scheduler is dropped.
pub struct WallClockScheduler {
    tx: Sender<Cmd>,
    next_id: u64,
}

impl WallClockScheduler {
    /// Spawn the worker. `fired` receives every token whose delay elapses
    /// without cancellation.
    pub fn spawn(fired: Sender<TimerToken>) -> Self {
        let (tx, rx) = unbounded();
        thread::Builder::new()
            .name("showreel-timer".into())
            .spawn(move || timer_loop(rx, fired))
            .expect("failed to spawn timer thread");
        Self { tx, next_id: 0 }
    }
}

impl DelayScheduler for WallClockScheduler {
    fn schedule(&mut self, delay: Duration, token: TimerToken) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let _ = self.tx.send(Cmd::Schedule {
            id,
            due: Instant::now() + delay,
            token,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        let _ = self.tx.send(Cmd::Cancel(id));
    }
}

fn timer_loop(rx: Receiver<Cmd>, fired: Sender<TimerToken>) {
    let mut pending: Vec<(TimerId, Instant, TimerToken)> = Vec::new();
    loop {
        // Deliver everything due.
        let now = Instant::now();
        let mut i = 0;
        while i < pending.len() {
            if pending[i].1 <= now {
                let (_, _, token) = pending.remove(i);
                if fired.send(token).is_err() {
                    return;
                }
            } else {
                i += 1;
            }
        }

        // Sleep until the nearest deadline or the next command.
        let nearest = pending.iter().map(|(_, due, _)| *due).min();
        let cmd = match nearest {
            Some(due) => match rx.recv_timeout(due.saturating_duration_since(Instant::now())) {
                Ok(cmd) => Some(cmd),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => return,
            },
            None => match rx.recv() {
                Ok(cmd) => Some(cmd),
                Err(_) => return,
            },
        };

        match cmd {
            Some(Cmd::Schedule { id, due, token }) => pending.push((id, due, token)),
            Some(Cmd::Cancel(id)) => pending.retain(|(tid, _, _)| *tid != id),
            None => {}
        }
    }
}
