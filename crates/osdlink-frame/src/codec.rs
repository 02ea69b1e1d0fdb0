use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use crc_any::CRCu8;
use tracing::debug;

use crate::error::{FrameError, Result};

/// Start-of-frame marker: `$` (0x24).
pub const START_MARKER: u8 = b'$';

/// Protocol family and frame length class. First bytes of the checksum domain.
pub const PREAMBLE: &[u8] = b"PCCOM,06,";

/// Separates the checksummed data from the checksum field: `*` (0x2A).
pub const CHECKSUM_MARKER: u8 = b'*';

/// End-of-frame terminator: CR LF.
pub const TERMINATOR: [u8; 2] = [0x0D, 0x0A];

/// A complete, ready-to-transmit command frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
    payload_len: usize,
    checksum: u8,
}

impl Frame {
    /// The full wire representation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total wire size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; even an empty payload yields markers and a checksum.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The payload carried inside the frame.
    pub fn payload(&self) -> &[u8] {
        let start = 1 + PREAMBLE.len();
        &self.bytes[start..start + self.payload_len]
    }

    /// The CRC-8/CDMA2000 embedded in the frame.
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Space separated lowercase hex of every wire byte.
    pub fn hex_dump(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Consume the frame and return its wire bytes.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytes.escape_ascii())
    }
}

/// CRC-8/CDMA2000 (poly 0x9B, init 0xFF, no reflection, no final XOR).
pub fn checksum(data: &[u8]) -> u8 {
    let mut crc = CRCu8::crc8cdma2000();
    crc.digest(data);
    crc.get_crc()
}

/// Build the wire frame for `payload`.
///
/// Wire format:
/// ```text
/// ┌─────┬───────────┬──────────┬─────┬──────────────┬───────┐
/// │ '$' │ PCCOM,06, │ payload  │ '*' │ crc8 hex     │ CR LF │
/// │     │ ◄──── checksum ────► │     │ (lowercase,  │       │
/// │     │       domain         │     │  unpadded)   │       │
/// └─────┴───────────┴──────────┴─────┴──────────────┴───────┘
/// ```
///
/// The payload is not inspected. A checksum below 0x10 renders as a single
/// hex digit, matching what devices expect on the wire.
pub fn encode(payload: &[u8]) -> Frame {
    let mut crc = CRCu8::crc8cdma2000();
    crc.digest(PREAMBLE);
    crc.digest(payload);
    let checksum = crc.get_crc();
    let hex = format!("{checksum:x}");

    let mut dst = BytesMut::with_capacity(
        1 + PREAMBLE.len() + payload.len() + 1 + hex.len() + TERMINATOR.len(),
    );
    dst.put_u8(START_MARKER);
    dst.put_slice(PREAMBLE);
    dst.put_slice(payload);
    dst.put_u8(CHECKSUM_MARKER);
    dst.put_slice(hex.as_bytes());
    dst.put_slice(&TERMINATOR);

    debug!(payload_len = payload.len(), checksum = %hex, "encoded frame");

    Frame {
        bytes: dst.freeze(),
        payload_len: payload.len(),
        checksum,
    }
}

/// The pieces of a verified frame, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameParts<'a> {
    /// Payload between the preamble and the checksum marker.
    pub payload: &'a [u8],
    /// Checksum carried by (and matching) the frame.
    pub checksum: u8,
}

/// Split `bytes` into its frame parts and re-check the checksum.
///
/// Accepts exactly one frame, terminator included. Checksum digits may be
/// upper or lower case.
pub fn verify_frame(bytes: &[u8]) -> Result<FrameParts<'_>> {
    if bytes.first() != Some(&START_MARKER) {
        return Err(FrameError::MissingStartMarker);
    }
    if !bytes.ends_with(&TERMINATOR) {
        return Err(FrameError::MissingTerminator);
    }

    let body = &bytes[1..bytes.len() - TERMINATOR.len()];
    let star = body
        .iter()
        .rposition(|&b| b == CHECKSUM_MARKER)
        .ok_or(FrameError::MissingChecksum)?;
    let (data, hex) = (&body[..star], &body[star + 1..]);

    let actual = parse_checksum(hex)?;
    let payload = data
        .strip_prefix(PREAMBLE)
        .ok_or(FrameError::UnexpectedPreamble)?;

    let expected = checksum(data);
    if expected != actual {
        return Err(FrameError::ChecksumMismatch { expected, actual });
    }

    Ok(FrameParts {
        payload,
        checksum: actual,
    })
}

fn parse_checksum(hex: &[u8]) -> Result<u8> {
    let invalid = || FrameError::InvalidChecksumHex(String::from_utf8_lossy(hex).into_owned());

    if hex.is_empty() || hex.len() > 2 || !hex.iter().all(u8::is_ascii_hexdigit) {
        return Err(invalid());
    }
    let text = std::str::from_utf8(hex).map_err(|_| invalid())?;
    u8::from_str_radix(text, 16).map_err(|_| invalid())
}
