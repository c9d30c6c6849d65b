use thiserror::Error;

/// serial-tail unified error type
#[derive(Error, Debug)]
pub enum TailError {
    #[error("Serial port {port} unavailable: {source}")]
    PortUnavailable {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Operation failed: {0}")]
    OperationFailure(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Output error: {0}")]
    Output(String),
}

pub type TailResult<T> = Result<T, TailError>;

impl TailError {
    /// Whether the failure happened before the port was opened
    pub fn is_port_unavailable(&self) -> bool {
        matches!(self, TailError::PortUnavailable { .. })
    }
}
