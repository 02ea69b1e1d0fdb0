/// Errors that can occur in link session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] osdlink_transport::TransportError),

    /// The reader thread could not be started.
    #[error("failed to spawn reader thread: {0}")]
    Spawn(std::io::Error),

    /// The read loop stopped on a stream error.
    #[error("read failed: {0}")]
    Read(std::io::Error),

    /// The reader thread panicked.
    #[error("reader thread panicked")]
    ReaderPanicked,
}

pub type Result<T> = std::result::Result<T, SessionError>;
