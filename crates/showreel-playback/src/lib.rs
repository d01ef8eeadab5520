//! Showreel Playback - Playlist snapshots and the playback sequencer
//!
//! Drives one virtual timeline across a playlist of independently-played
//! sources:
//! - `playlist`: immutable snapshots of the media list
//! - `source`: the media source seam the sequencer commands
//! - `scheduler`: injectable delay scheduling (manual and wall-clock)
//! - `sequencer`: the state machine itself

pub mod playlist;
pub mod scheduler;
pub mod sequencer;
pub mod source;

pub use playlist::{Playlist, PlaylistEntry, StartMode};
pub use scheduler::{
    DelayScheduler, ManualScheduler, TimerId, TimerPurpose, TimerToken, WallClockScheduler,
};
pub use sequencer::{PlayState, PreviewSequencer, SequencerEvent};
pub use source::SourceHost;
