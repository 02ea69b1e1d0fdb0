//! Duplex byte-stream abstraction for osdlink.
//!
//! This is the lowest layer of osdlink. It supplies:
//! - [`DuplexStream`], the capability the link session owns (read, write,
//!   clone a second handle, release)
//! - [`SerialLink`], a [`DuplexStream`] backed by a `serialport` handle
//! - [`available_ports`] for discovering attached devices
//!
//! Port configuration is fixed at open time; nothing above this crate knows
//! about baud rates or stop bits.

pub mod config;
pub mod error;
pub mod serial;
pub mod traits;

pub use config::{SerialConfig, DEFAULT_BAUD_RATE, DEFAULT_PORT, DEFAULT_READ_TIMEOUT};
pub use error::{Result, TransportError};
pub use serial::{available_ports, PortInfo, SerialLink};
pub use traits::DuplexStream;
