// Core module - Line decoding, session lifecycle and the tail loop
pub mod line;
pub mod session;
pub mod tailer;

pub use line::decode_line;
pub use session::SerialSession;
pub use tailer::{SerialLogTailer, TailSummary};
