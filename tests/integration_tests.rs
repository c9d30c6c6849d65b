use serial_tail::cli::output::ConsoleWriter;
use serial_tail::cli::commands::report_tail_error;
use serial_tail::domain::config::OutputFormat;
use serial_tail::{LineSource, PortSettings, SerialLogTailer, TailError, TailResult};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Serves a fixed list of raw chunks, one per `read_line`
struct ReplaySource {
    chunks: VecDeque<Vec<u8>>,
    fail_when_drained: bool,
    closes: Arc<AtomicUsize>,
}

impl LineSource for ReplaySource {
    fn bytes_available(&mut self) -> io::Result<u32> {
        match self.chunks.front() {
            Some(chunk) => Ok(chunk.len() as u32),
            None if self.fail_when_drained => {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "access revoked"))
            }
            None => Ok(0),
        }
    }

    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        let chunk = self.chunks.pop_front().unwrap_or_default();
        buf.extend_from_slice(&chunk);
        Ok(chunk.len())
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

fn replay(
    chunks: &[&[u8]],
    fail_when_drained: bool,
    closes: &Arc<AtomicUsize>,
) -> impl FnOnce(&PortSettings) -> TailResult<ReplaySource> {
    let chunks: VecDeque<Vec<u8>> = chunks.iter().map(|c| c.to_vec()).collect();
    let closes = Arc::clone(closes);
    move |_| {
        Ok(ReplaySource {
            chunks,
            fail_when_drained,
            closes,
        })
    }
}

/// Run one pass the way the `tail` command does and capture stdout
async fn run_tail<F>(open: F, duration: Duration) -> String
where
    F: FnOnce(&PortSettings) -> TailResult<ReplaySource>,
{
    let mut writer = ConsoleWriter::with_output(OutputFormat::Text, Vec::new());
    let result = SerialLogTailer::default()
        .tail(&PortSettings::for_port("COM10"), duration, open, &mut writer)
        .await;
    if let Err(e) = result {
        report_tail_error(&e, &mut writer);
    }
    String::from_utf8(writer.into_inner()).expect("Invalid UTF-8")
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_blank_line_suppressed_between_banners() {
        let closes = Arc::new(AtomicUsize::new(0));
        let output = run_tail(
            replay(&[b"A\n", b"\n", b"B\n"], false, &closes),
            Duration::from_secs(1),
        )
        .await;

        let lines: Vec<&str> = output.lines().collect();
        let separator = "=".repeat(60);
        assert_eq!(
            lines,
            vec![
                "Connected to serial port COM10",
                "Reading log...",
                separator.as_str(),
                "A",
                "B",
                separator.as_str(),
                "Log reading complete",
            ]
        );
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_garbled_bytes_are_dropped_from_output() {
        let closes = Arc::new(AtomicUsize::new(0));
        let output = run_tail(
            replay(&[b"\xffI (120) wifi: connected\xfe\r\n", b"\x80\x80\r\n"], false, &closes),
            Duration::from_secs(1),
        )
        .await;

        assert!(output.contains("\nI (120) wifi: connected\n"));
        assert!(!output.contains('\u{FFFD}'));
        assert_eq!(output.lines().count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_prints_only_error_line() {
        let output = run_tail(
            |settings: &PortSettings| -> TailResult<ReplaySource> {
                Err(TailError::PortUnavailable {
                    port: settings.port.clone(),
                    source: serialport::Error::new(
                        serialport::ErrorKind::NoDevice,
                        "The system cannot find the file specified.",
                    ),
                })
            },
            Duration::from_secs(30),
        )
        .await;

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Error: "));
        assert!(lines[0].contains("cannot find the file"));
        assert!(!output.contains("Connected"));
        assert!(!output.contains("Reading log..."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_mid_loop_is_reported_and_port_closed_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        let output = run_tail(
            replay(&[b"first\n", b"second\n"], true, &closes),
            Duration::from_secs(30),
        )
        .await;

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[3], "first");
        assert_eq!(lines[4], "second");
        assert!(lines[5].starts_with("Error: "));
        assert!(lines[5].contains("access revoked"));
        assert_eq!(lines.len(), 6);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duration_respected_with_poll_slack() {
        let closes = Arc::new(AtomicUsize::new(0));
        let started = tokio::time::Instant::now();
        let _ = run_tail(replay(&[], false, &closes), Duration::from_millis(1250)).await;
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(1250));
        assert!(elapsed <= Duration::from_millis(1350));
    }

    #[tokio::test]
    async fn test_real_port_open_failure() {
        let mut writer = ConsoleWriter::with_output(OutputFormat::Text, Vec::new());
        let result = SerialLogTailer::default()
            .tail(
                &PortSettings::for_port("/dev/serial-tail-no-such-device"),
                Duration::from_secs(30),
                serial_tail::SerialLineSource::open,
                &mut writer,
            )
            .await;

        assert!(matches!(result, Err(TailError::PortUnavailable { .. })));
        assert!(writer.into_inner().is_empty());
    }
}
