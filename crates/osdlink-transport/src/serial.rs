use std::io::{self, Read, Write};

use serialport::{SerialPort, SerialPortType};
use tracing::{debug, info};

use crate::config::SerialConfig;
use crate::error::{Result, TransportError};
use crate::traits::DuplexStream;

/// A serial port opened with fixed line settings.
///
/// Reads return `io::ErrorKind::TimedOut` when no byte arrives within the
/// configured read timeout; callers polling for cancellation treat that as
/// "nothing yet", not as a failure.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialLink {
    /// Open and configure the port described by `config`.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .data_bits(config.data_bits)
            .stop_bits(config.stop_bits)
            .parity(config.parity)
            .flow_control(config.flow_control)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: config.port.clone(),
                source,
            })?;

        info!(
            port = %config.port,
            baud = config.baud_rate,
            "opened serial port"
        );

        Ok(Self {
            port,
            name: config.port.clone(),
        })
    }
}

impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

impl DuplexStream for SerialLink {
    fn try_clone_handle(&self) -> io::Result<Self> {
        let port = self.port.try_clone().map_err(io::Error::from)?;
        debug!(port = %self.name, "cloned serial handle");
        Ok(Self {
            port,
            name: self.name.clone(),
        })
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("port", &self.name)
            .finish()
    }
}

/// A serial port discovered on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Device path or COM port name.
    pub name: String,
    /// Bus the port sits on: `usb`, `pci`, `bluetooth` or `unknown`.
    pub kind: &'static str,
    /// USB manufacturer/product description, when reported.
    pub description: Option<String>,
}

/// Enumerate serial ports attached to this host.
pub fn available_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports().map_err(TransportError::Enumerate)?;
    Ok(ports.into_iter().map(port_info).collect())
}

fn port_info(port: serialport::SerialPortInfo) -> PortInfo {
    let (kind, description) = match port.port_type {
        SerialPortType::UsbPort(usb) => {
            let description = match (usb.manufacturer, usb.product) {
                (Some(m), Some(p)) => Some(format!("{m} {p}")),
                (Some(m), None) => Some(m),
                (None, Some(p)) => Some(p),
                (None, None) => Some(format!("{:04x}:{:04x}", usb.vid, usb.pid)),
            };
            ("usb", description)
        }
        SerialPortType::PciPort => ("pci", None),
        SerialPortType::BluetoothPort => ("bluetooth", None),
        SerialPortType::Unknown => ("unknown", None),
    };

    PortInfo {
        name: port.port_name,
        kind,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_port_reports_port_name() {
        let cfg = SerialConfig::new("/dev/osdlink-does-not-exist", 38_400);
        let err = SerialLink::open(&cfg).unwrap_err();
        match &err {
            TransportError::Open { port, .. } => assert_eq!(port, "/dev/osdlink-does-not-exist"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("/dev/osdlink-does-not-exist"));
    }

    #[test]
    fn usb_port_description_prefers_manufacturer_and_product() {
        let info = port_info(serialport::SerialPortInfo {
            port_name: "/dev/ttyUSB0".to_string(),
            port_type: SerialPortType::UsbPort(serialport::UsbPortInfo {
                vid: 0x10c4,
                pid: 0xea60,
                serial_number: None,
                manufacturer: Some("Silicon Labs".to_string()),
                product: Some("CP2102".to_string()),
            }),
        });
        assert_eq!(info.kind, "usb");
        assert_eq!(info.description.as_deref(), Some("Silicon Labs CP2102"));
    }

    #[test]
    fn usb_port_without_strings_falls_back_to_ids() {
        let info = port_info(serialport::SerialPortInfo {
            port_name: "/dev/ttyUSB1".to_string(),
            port_type: SerialPortType::UsbPort(serialport::UsbPortInfo {
                vid: 0x10c4,
                pid: 0xea60,
                serial_number: None,
                manufacturer: None,
                product: None,
            }),
        });
        assert_eq!(info.description.as_deref(), Some("10c4:ea60"));
    }

    #[test]
    fn non_usb_ports_have_no_description() {
        let info = port_info(serialport::SerialPortInfo {
            port_name: "/dev/ttyS0".to_string(),
            port_type: SerialPortType::Unknown,
        });
        assert_eq!(info.kind, "unknown");
        assert!(info.description.is_none());
    }
}
