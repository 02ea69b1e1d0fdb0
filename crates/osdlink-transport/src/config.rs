use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, StopBits};

/// Default port path (CP210x bridge on macOS).
pub const DEFAULT_PORT: &str = "/dev/cu.SLAB_USBtoUART";

/// Default link speed of the OSD's configuration UART.
pub const DEFAULT_BAUD_RATE: u32 = 38_400;

/// Default read timeout. Bounds how long a blocked read can delay cancellation.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Serial line settings applied when the port is opened.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Device path or COM port name.
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Data bits. Default: 8.
    pub data_bits: DataBits,
    /// Stop bits. Default: 1.
    pub stop_bits: StopBits,
    /// Parity. Default: none.
    pub parity: Parity,
    /// Flow control. Default: none.
    pub flow_control: FlowControl,
    /// Read timeout for blocking reads.
    pub read_timeout: Duration,
}

impl SerialConfig {
    /// 8N1 settings for `port` at `baud_rate`.
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            ..Self::default()
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}
