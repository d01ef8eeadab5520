//! The media source seam.
//!
//! The sequencer commands a host through this trait; the host answers
//! asynchronously by calling the sequencer's event intake
//! (`on_source_ready` and friends). Video playback and still-image display
//! are two concrete providers behind the same abstraction.

use showreel_core::Seconds;

use crate::playlist::PlaylistEntry;

/// Commands the sequencer issues to the surrounding media machinery.
///
/// All methods are fire-and-forget: failures are reported back through
/// [`PreviewSequencer::on_source_failed`], never synchronously. Loading a
/// new source implicitly replaces whatever was attached before.
///
/// [`PreviewSequencer::on_source_failed`]: crate::sequencer::PreviewSequencer::on_source_failed
pub trait SourceHost {
    /// Attach a video source. The host reports readiness via
    /// `on_source_ready`, then source-local time via `on_time_update` and
    /// natural end via `on_source_ended`.
    fn load_video(&mut self, entry: &PlaylistEntry);

    /// Display a still image. The host reports `on_source_ready` once the
    /// image is visible, or `on_source_failed` if the fetch fails.
    fn show_image(&mut self, entry: &PlaylistEntry);

    /// Seek the attached video source to a source-local time.
    fn seek(&mut self, to: Seconds);

    /// Begin or resume playback of the attached source.
    fn play(&mut self);

    /// Halt the attached source without detaching it.
    fn pause(&mut self);

    /// Halt and release the attached source, if any.
    fn detach(&mut self);
}
