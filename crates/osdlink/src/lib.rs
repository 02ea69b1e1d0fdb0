//! Serial OSD configuration over the checksum-framed PCCOM protocol.
//!
//! osdlink opens a serial link to an on-screen-display board, drains the
//! telemetry it emits, and sends `$PCCOM,06,...*crc\r\n` configuration frames.
//!
//! # Crate Structure
//!
//! - [`transport`] — Duplex stream abstraction and serial port access
//! - [`frame`] — Frame encoding, CRC-8/CDMA2000 checksum, verification
//! - [`session`] — Link session: background reader plus framed sender

/// Re-export transport types.
pub mod transport {
    pub use osdlink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use osdlink_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use osdlink_session::*;
}

#[cfg(test)]
mod tests {
    #[test]
    fn facade_exposes_the_full_stack() {
        let frame = crate::frame::encode(crate::frame::ARDUPILOT_115200.payload.as_bytes());
        assert_eq!(frame.checksum(), 0x71);

        let config = crate::session::SessionConfig::default();
        assert_eq!(config.read_chunk_size, crate::session::DEFAULT_READ_CHUNK_SIZE);

        let serial = crate::transport::SerialConfig::default();
        assert_eq!(serial.baud_rate, crate::transport::DEFAULT_BAUD_RATE);
    }
}
