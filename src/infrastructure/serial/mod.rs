// Serial module - Serial port access
pub mod client;
pub mod discovery;

pub use client::{LineSource, SerialLineSource};
pub use discovery::{list_ports, PortSummary};
