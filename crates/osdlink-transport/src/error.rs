/// Errors that can occur while opening or driving a serial transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the specified serial port.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// Failed to enumerate serial ports.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// The `io::ErrorKind` closest to this error, for exit-code mapping.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            TransportError::Open { source, .. } | TransportError::Enumerate(source) => {
                match source.kind() {
                    serialport::ErrorKind::Io(kind) => Some(kind),
                    serialport::ErrorKind::NoDevice => Some(std::io::ErrorKind::NotFound),
                    _ => None,
                }
            }
            TransportError::Io(err) => Some(err.kind()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
