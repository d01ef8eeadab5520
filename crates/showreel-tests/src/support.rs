//! Shared test doubles.

use parking_lot::Mutex;
use showreel_core::{MediaId, Seconds};
use showreel_playback::{PlaylistEntry, SourceHost};
use std::sync::Arc;

/// One command the sequencer issued to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    LoadVideo(MediaId),
    ShowImage(MediaId),
    Seek(Seconds),
    Play,
    Pause,
    Detach,
}

/// Recording host: every command is appended to a shared log. Clones share
/// the log, so a test keeps one handle while the sequencer owns the other.
#[derive(Clone, Default)]
pub struct MockHost {
    calls: Arc<Mutex<Vec<HostCall>>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every command issued so far.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    /// Drain the log, returning the commands issued since the last take.
    pub fn take_calls(&self) -> Vec<HostCall> {
        std::mem::take(&mut *self.calls.lock())
    }
}

impl SourceHost for MockHost {
    fn load_video(&mut self, entry: &PlaylistEntry) {
        self.calls.lock().push(HostCall::LoadVideo(entry.id));
    }

    fn show_image(&mut self, entry: &PlaylistEntry) {
        self.calls.lock().push(HostCall::ShowImage(entry.id));
    }

    fn seek(&mut self, to: Seconds) {
        self.calls.lock().push(HostCall::Seek(to));
    }

    fn play(&mut self) {
        self.calls.lock().push(HostCall::Play);
    }

    fn pause(&mut self) {
        self.calls.lock().push(HostCall::Pause);
    }

    fn detach(&mut self) {
        self.calls.lock().push(HostCall::Detach);
    }
}
