use crate::domain::error::{TailError, TailResult};
use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};

/// A serial port reported by the operating system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortSummary {
    pub name: String,
    pub kind: String,
}

impl From<SerialPortInfo> for PortSummary {
    fn from(info: SerialPortInfo) -> Self {
        let kind = match info.port_type {
            SerialPortType::UsbPort(usb) => match usb.product {
                Some(product) => format!("USB {:04x}:{:04x} {}", usb.vid, usb.pid, product),
                None => format!("USB {:04x}:{:04x}", usb.vid, usb.pid),
            },
            SerialPortType::PciPort => "PCI".to_string(),
            SerialPortType::BluetoothPort => "Bluetooth".to_string(),
            SerialPortType::Unknown => "unknown".to_string(),
        };

        Self {
            name: info.port_name,
            kind,
        }
    }
}

/// List the serial ports available on this machine, sorted by name
pub fn list_ports() -> TailResult<Vec<PortSummary>> {
    let ports = serialport::available_ports().map_err(|e| TailError::OperationFailure(e.into()))?;

    let mut ports: Vec<PortSummary> = ports.into_iter().map(PortSummary::from).collect();
    ports.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(ports)
}
