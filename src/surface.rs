//! A "surface" is somewhere the dashboard gets drawn. The real one is the
//! terminal; tests swap in a recorder.

use crate::display::Frame;
use std::time::Duration;

/// Something that can show a [Frame]. The app loop calls [Surface::on_tick]
/// once per [Surface::INTERVAL], plus once after each input event, so the
/// surface should skip work if nothing changed.
pub trait Surface {
    const INTERVAL: Duration = Duration::from_millis(1000);

    /// Get a descriptive name for this surface, for logging
    fn name(&self) -> &str;

    /// Prepare the surface, once on startup
    fn on_start(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Show the latest frame
    fn on_tick(&mut self, frame: &Frame) -> anyhow::Result<()>;

    /// Hand the surface back, once on shutdown. This is called even if the
    /// loop failed.
    fn on_stop(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
