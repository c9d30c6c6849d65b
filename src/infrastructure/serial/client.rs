use crate::domain::{config::PortSettings, error::{TailError, TailResult}};
use serialport::SerialPort;
use std::io::{self, BufRead, BufReader, ErrorKind};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Longest line returned by a single `read_line`
pub const MAX_LINE_LEN: usize = 4096;

/// Line-oriented byte source polled by the tailer
pub trait LineSource {
    /// Bytes that can be read without waiting
    fn bytes_available(&mut self) -> io::Result<u32>;

    /// Append one line (terminator included) to `buf`.
    ///
    /// A read timeout in the middle of a line returns the partial line.
    /// Returns the number of bytes appended.
    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize>;

    /// Release the underlying device
    fn close(&mut self);
}

/// `LineSource` backed by an OS serial port
pub struct SerialLineSource {
    port_name: String,
    read_timeout: Duration,
    reader: Option<BufReader<Box<dyn SerialPort>>>,
}

impl SerialLineSource {
    pub fn open(settings: &PortSettings) -> TailResult<Self> {
        let port = serialport::new(&settings.port, settings.baud_rate)
            .timeout(settings.read_timeout)
            .open()
            .map_err(|source| TailError::PortUnavailable {
                port: settings.port.clone(),
                source,
            })?;

        info!(
            port = %settings.port,
            baud_rate = settings.baud_rate,
            "Serial port opened successfully"
        );

        Ok(Self::from_port(&settings.port, port, settings.read_timeout))
    }

    /// Wrap an already opened port
    pub fn from_port(port_name: impl Into<String>, port: Box<dyn SerialPort>, read_timeout: Duration) -> Self {
        Self {
            port_name: port_name.into(),
            read_timeout,
            reader: Some(BufReader::new(port)),
        }
    }

    fn reader(&mut self) -> io::Result<&mut BufReader<Box<dyn SerialPort>>> {
        self.reader.as_mut().ok_or_else(|| {
            io::Error::new(ErrorKind::NotConnected, format!("serial port {} is closed", self.port_name))
        })
    }
}

impl LineSource for SerialLineSource {
    fn bytes_available(&mut self) -> io::Result<u32> {
        let reader = self.reader()?;
        let buffered = reader.buffer().len() as u32;
        let pending = reader.get_ref().bytes_to_read()?;
        Ok(buffered + pending)
    }

    /// The read timeout bounds the whole line, not each underlying read, so
    /// a device that never sends `\n` cannot hold the caller past it.
    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        let deadline = Instant::now() + self.read_timeout;
        let reader = self.reader()?;
        let start = buf.len();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!("Line deadline passed with {} bytes of partial line", buf.len() - start);
                return Ok(buf.len() - start);
            }
            if reader.buffer().is_empty() {
                reader.get_mut().set_timeout(remaining)?;
            }

            let (done, used) = {
                let available = match reader.fill_buf() {
                    Ok(available) => available,
                    Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(ref e) if e.kind() == ErrorKind::TimedOut => {
                        debug!("Read timed out with {} bytes of partial line", buf.len() - start);
                        return Ok(buf.len() - start);
                    }
                    Err(e) => return Err(e),
                };
                if available.is_empty() {
                    return Ok(buf.len() - start);
                }

                let room = MAX_LINE_LEN - (buf.len() - start);
                let window = &available[..available.len().min(room)];
                match window.iter().position(|&b| b == b'\n') {
                    Some(i) => {
                        buf.extend_from_slice(&window[..=i]);
                        (true, i + 1)
                    }
                    None => {
                        buf.extend_from_slice(window);
                        (window.len() == room, window.len())
                    }
                }
            };
            reader.consume(used);

            if done {
                return Ok(buf.len() - start);
            }
        }
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            info!(port = %self.port_name, "Serial port closed");
        }
    }
}


#[cfg(all(test, unix))]
mod pty_tests {
    use super::*;
    use serialport::TTYPort;
    use std::io::Write;
    use std::thread;

    fn pty_source(read_timeout: Duration) -> (TTYPort, SerialLineSource) {
        let (master, slave) = TTYPort::pair().expect("Failed to create pty pair");
        let source = SerialLineSource::from_port("pty", Box::new(slave), read_timeout);
        (master, source)
    }

    #[test]
    fn test_partial_line_returned_on_timeout() {
        let (mut master, mut source) = pty_source(Duration::from_millis(200));
        master.write_all(b"partial").unwrap();

        let started = Instant::now();
        let mut buf = Vec::new();
        let n = source.read_line(&mut buf).unwrap();

        assert_eq!(n, 7);
        assert_eq!(buf, b"partial");
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_trickling_data_without_newline_is_bounded() {
        let (mut master, mut source) = pty_source(Duration::from_millis(300));
        let writer = thread::spawn(move || {
            for _ in 0..100 {
                if master.write_all(b"xxxxxxxx\r").is_err() {
                    break;
                }
                thread::sleep(Duration::from_millis(20));
            }
        });
        thread::sleep(Duration::from_millis(30));

        let started = Instant::now();
        let mut buf = Vec::new();
        let n = source.read_line(&mut buf).unwrap();
        let took = started.elapsed();

        assert!(took <= Duration::from_millis(800), "read_line took {took:?}");
        assert!(n > 0);
        assert!(!buf.contains(&b'\n'));

        source.close();
        writer.join().unwrap();
    }

    #[test]
    fn test_buffered_lines_count_as_available() {
        let (mut master, mut source) = pty_source(Duration::from_millis(500));
        master.write_all(b"one\ntwo\n").unwrap();
        thread::sleep(Duration::from_millis(50));

        let mut buf = Vec::new();
        source.read_line(&mut buf).unwrap();
        assert_eq!(buf, b"one\n");
        // "two\n" now sits in the line buffer, not in the driver
        assert_eq!(source.bytes_available().unwrap(), 4);

        buf.clear();
        source.read_line(&mut buf).unwrap();
        assert_eq!(buf, b"two\n");
        assert_eq!(source.bytes_available().unwrap(), 0);
    }

    #[test]
    fn test_overlong_line_is_split() {
        let (mut master, mut source) = pty_source(Duration::from_secs(1));
        master.set_timeout(Duration::from_secs(2)).unwrap();
        let writer = thread::spawn(move || {
            master.write_all(&[b'a'; MAX_LINE_LEN + 100]).unwrap();
            master.write_all(b"\n").unwrap();
            thread::sleep(Duration::from_secs(1));
            master
        });

        let mut buf = Vec::new();
        assert_eq!(source.read_line(&mut buf).unwrap(), MAX_LINE_LEN);

        buf.clear();
        assert_eq!(source.read_line(&mut buf).unwrap(), 101);
        assert_eq!(buf.last(), Some(&b'\n'));

        writer.join().unwrap();
    }

    #[test]
    fn test_closed_source_refuses_reads() {
        let (_master, mut source) = pty_source(Duration::from_millis(100));
        source.close();

        let error = source.bytes_available().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotConnected);
    }
}
