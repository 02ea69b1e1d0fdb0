//! Link session management for serial OSD devices.
//!
//! A [`LinkSession`] owns an open [`DuplexStream`](osdlink_transport::DuplexStream),
//! drains everything the device sends on a background thread, and writes
//! framed configuration commands on the caller's thread. Dropping the session
//! stops and joins the reader.

pub mod config;
pub mod error;
pub mod session;
pub mod sink;

pub use config::{SessionConfig, DEFAULT_READ_CHUNK_SIZE};
pub use error::{Result, SessionError};
pub use session::{LinkSession, ReadExit, ReaderState};
pub use sink::{ObservationSink, TextSink, Utf8Carry};
