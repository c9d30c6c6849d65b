use crate::domain::{config::PortSettings, error::TailResult};
use crate::infrastructure::serial::LineSource;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// An open serial endpoint with a bounded reading window.
///
/// The session owns its source exclusively and closes it exactly once:
/// through [`SerialSession::close`] on the normal path, or on drop when a
/// read fails and the session is abandoned. `close` consumes the session, so
/// a closed handle cannot be read again.
pub struct SerialSession<S: LineSource> {
    settings: PortSettings,
    duration: Duration,
    started_at: Instant,
    source: S,
    closed: bool,
}

impl<S: LineSource> SerialSession<S> {
    /// Open a session using `open` to acquire the source
    pub fn open<F>(settings: &PortSettings, duration: Duration, open: F) -> TailResult<Self>
    where
        F: FnOnce(&PortSettings) -> TailResult<S>,
    {
        let source = open(settings)?;
        debug!(
            port = %settings.port,
            baud_rate = settings.baud_rate,
            read_timeout = ?settings.read_timeout,
            ?duration,
            "Serial session opened"
        );

        Ok(Self {
            settings: settings.clone(),
            duration,
            started_at: Instant::now(),
            source,
            closed: false,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.settings.port
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Whether the reading window is used up
    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.duration
    }

    pub fn bytes_available(&mut self) -> TailResult<u32> {
        Ok(self.source.bytes_available()?)
    }

    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> TailResult<usize> {
        Ok(self.source.read_line(buf)?)
    }

    /// Release the device
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            self.source.close();
        }
    }
}

impl<S: LineSource> Drop for SerialSession<S> {
    fn drop(&mut self) {
        if !self.closed {
            warn!(port = %self.settings.port, "Serial session dropped while open, closing");
            self.release();
        }
    }
}
