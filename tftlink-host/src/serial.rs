//! OS serial port channel
//!
//! Opens a serial device with the `serialport` crate and exposes it as a
//! [`SerialTx`] channel for the transport driver.

use std::io::{self, Write};
use std::time::Duration;

use log::debug;
use serialport::{FlowControl, SerialPort};
use tftlink_hal::{DataBits, Parity, SerialConfig, SerialTx, StopBits};

use crate::transport::ChannelProvider;

fn data_bits(bits: DataBits) -> serialport::DataBits {
    match bits {
        DataBits::Five => serialport::DataBits::Five,
        DataBits::Six => serialport::DataBits::Six,
        DataBits::Seven => serialport::DataBits::Seven,
        DataBits::Eight => serialport::DataBits::Eight,
    }
}

fn parity(parity: Parity) -> serialport::Parity {
    match parity {
        Parity::None => serialport::Parity::None,
        Parity::Even => serialport::Parity::Even,
        Parity::Odd => serialport::Parity::Odd,
    }
}

fn stop_bits(bits: StopBits) -> serialport::StopBits {
    match bits {
        StopBits::One => serialport::StopBits::One,
        StopBits::Two => serialport::StopBits::Two,
    }
}

/// Opens OS serial ports
#[derive(Debug, Clone, Copy)]
pub struct SerialPortProvider {
    timeout: Duration,
}

impl SerialPortProvider {
    /// `timeout` bounds each blocking write on opened ports
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ChannelProvider for SerialPortProvider {
    type Channel = SerialPortChannel;

    fn open(&self, address: &str, config: &SerialConfig) -> io::Result<SerialPortChannel> {
        debug!(
            "Opening {} ({} baud, {:?}, {:?}, {:?})",
            address, config.baudrate, config.data_bits, config.parity, config.stop_bits
        );

        let port = serialport::new(address, config.baudrate)
            .data_bits(data_bits(config.data_bits))
            .parity(parity(config.parity))
            .stop_bits(stop_bits(config.stop_bits))
            .flow_control(FlowControl::None)
            .timeout(self.timeout)
            .open()?;

        Ok(SerialPortChannel { port })
    }
}

/// An open OS serial port
pub struct SerialPortChannel {
    port: Box<dyn SerialPort>,
}

impl SerialPortChannel {
    /// Device name as reported by the OS, if any
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

impl SerialTx for SerialPortChannel {
    type Error = io::Error;

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        Write::write_all(&mut self.port, data)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_settings_map() {
        assert_eq!(data_bits(DataBits::Seven), serialport::DataBits::Seven);
        assert_eq!(parity(Parity::Odd), serialport::Parity::Odd);
        assert_eq!(stop_bits(StopBits::Two), serialport::StopBits::Two);
    }

    #[test]
    fn test_missing_device_fails_to_open() {
        let provider = SerialPortProvider::new(Duration::from_millis(100));
        let result = provider.open("/dev/tftlink-does-not-exist", &SerialConfig::new(115200));
        assert!(result.is_err());
    }
}
