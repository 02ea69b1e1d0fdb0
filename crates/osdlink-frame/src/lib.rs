//! PCCOM command framing for serial OSD devices.
//!
//! Every command is an ASCII line of the form:
//! - a `$` start marker
//! - the `PCCOM,06,` preamble
//! - the opaque configuration payload
//! - `*` followed by the CRC-8/CDMA2000 of preamble + payload in lowercase hex
//! - a CR LF terminator
//!
//! Encoding is pure and infallible; the only fallible paths are writing a
//! frame to a stream and verifying bytes that claim to be a frame.

pub mod codec;
pub mod error;
pub mod profile;
pub mod writer;

pub use codec::{
    checksum, encode, verify_frame, Frame, FrameParts, CHECKSUM_MARKER, PREAMBLE, START_MARKER,
    TERMINATOR,
};
pub use error::{FrameError, Result};
pub use profile::{Profile, ARDUPILOT_115200, PROFILES};
pub use writer::FrameWriter;
