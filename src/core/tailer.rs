use crate::cli::output::OutputWriter;
use crate::core::{line::decode_line, session::SerialSession};
use crate::domain::{
    config::{PortSettings, POLL_INTERVAL},
    error::TailResult,
};
use crate::infrastructure::serial::LineSource;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Statistics of one tail pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TailSummary {
    pub port: String,
    pub lines_emitted: usize,
    pub blank_lines: usize,
    pub bytes_read: u64,
    pub elapsed: Duration,
}

impl TailSummary {
    fn new(port: &str) -> Self {
        Self {
            port: port.to_string(),
            lines_emitted: 0,
            blank_lines: 0,
            bytes_read: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Polls a serial session for text lines and writes them out
#[derive(Debug, Clone)]
pub struct SerialLogTailer {
    poll_interval: Duration,
}

impl Default for SerialLogTailer {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

impl SerialLogTailer {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Open the port, print banners and every received line until
    /// `duration` elapses, then close the port.
    ///
    /// On error the session (if opened) is closed by drop and the error is
    /// returned to the caller for reporting.
    pub async fn tail<S, F, W>(
        &self,
        settings: &PortSettings,
        duration: Duration,
        open: F,
        writer: &mut W,
    ) -> TailResult<TailSummary>
    where
        S: LineSource,
        F: FnOnce(&PortSettings) -> TailResult<S>,
        W: OutputWriter + ?Sized,
    {
        let mut session = SerialSession::open(settings, duration, open)?;

        writer.write_connected(session.port_name())?;
        writer.write_reading_started()?;

        let summary = self.run(&mut session, writer).await?;

        writer.write_reading_complete(&summary)?;
        session.close();

        info!(
            port = %summary.port,
            lines = summary.lines_emitted,
            blank = summary.blank_lines,
            bytes = summary.bytes_read,
            "Tail complete"
        );
        Ok(summary)
    }

    /// Read loop over an open session
    pub async fn run<S, W>(&self, session: &mut SerialSession<S>, writer: &mut W) -> TailResult<TailSummary>
    where
        S: LineSource,
        W: OutputWriter + ?Sized,
    {
        let mut summary = TailSummary::new(session.port_name());
        let mut buf = Vec::with_capacity(256);

        while !session.is_expired() {
            if session.bytes_available()? == 0 {
                tokio::time::sleep(self.poll_interval).await;
                continue;
            }

            buf.clear();
            let n = session.read_line(&mut buf)?;
            if n == 0 {
                tokio::time::sleep(self.poll_interval).await;
                continue;
            }
            summary.bytes_read += n as u64;

            match decode_line(&buf) {
                Some(line) => {
                    debug!("Received {} bytes: {}", n, line);
                    writer.write_line(&line, session.elapsed())?;
                    summary.lines_emitted += 1;
                }
                None => summary.blank_lines += 1,
            }
        }

        summary.elapsed = session.elapsed();
        Ok(summary)
    }
}
