/// Errors that can occur while writing or verifying frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An I/O error occurred while writing a frame.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream accepted only part of the frame.
    #[error("short write ({written} of {expected} bytes)")]
    ShortWrite { written: usize, expected: usize },

    /// The bytes do not begin with the `$` start marker.
    #[error("missing start marker '$'")]
    MissingStartMarker,

    /// The bytes do not end with CR LF.
    #[error("missing CR LF terminator")]
    MissingTerminator,

    /// No `*` separates the data from the checksum.
    #[error("missing checksum marker '*'")]
    MissingChecksum,

    /// The checksum field is not a 1-2 digit hex number.
    #[error("invalid checksum field {0:?}")]
    InvalidChecksumHex(String),

    /// The data does not start with the `PCCOM,06,` preamble.
    #[error("unexpected preamble (expected \"PCCOM,06,\")")]
    UnexpectedPreamble,

    /// The embedded checksum does not match the recomputed one.
    #[error("checksum mismatch (frame says {actual:02x}, computed {expected:02x})")]
    ChecksumMismatch { expected: u8, actual: u8 },
}

pub type Result<T> = std::result::Result<T, FrameError>;
