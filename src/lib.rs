//! serial-tail Library
//!
//! Opens an embedded device's serial console, prints the text lines it
//! sends for a fixed window, and closes the port again.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use domain::error::{TailError, TailResult};
pub use domain::config::{PortSettings, TailConfig};
pub use crate::core::{decode_line, SerialLogTailer, SerialSession, TailSummary};
pub use infrastructure::serial::{LineSource, SerialLineSource};
