// Session module - Ownership of an open serial endpoint
pub mod session;

pub use session::SerialSession;
