//! Host configuration
//!
//! Settings are read from a TOML file (see [`loader`]) and can be
//! overridden from the command line. Every field has a default, so an empty
//! or missing file gives a working 460800-baud setup on `/dev/ttyUSB0`.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;
use tftlink_hal::{DataBits, Parity, SerialConfig, StopBits};
use tftlink_protocol::LengthWidth;

use crate::session::SessionSettings;
use crate::transport::{DumpLimits, TransportConfig};

pub use loader::{load, parse, ConfigError, Overrides};

/// Complete host configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    pub serial: SerialSection,
    pub protocol: ProtocolSection,
    pub transport: TransportSection,
    pub diagnostics: DiagnosticsSection,
    pub session: SessionSection,
}

/// `[serial]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialSection {
    /// Device path or name (`/dev/ttyUSB0`, `COM3`)
    pub port: String,
    pub baud: u32,
    pub data_bits: u8,
    pub parity: ParitySetting,
    pub stop_bits: u8,
    /// Per-write timeout of the OS port
    pub timeout_ms: u64,
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            port: String::from("/dev/ttyUSB0"),
            baud: 460800,
            data_bits: 8,
            parity: ParitySetting::None,
            stop_bits: 1,
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParitySetting {
    #[default]
    None,
    Even,
    Odd,
}

impl From<ParitySetting> for Parity {
    fn from(setting: ParitySetting) -> Self {
        match setting {
            ParitySetting::None => Parity::None,
            ParitySetting::Even => Parity::Even,
            ParitySetting::Odd => Parity::Odd,
        }
    }
}

/// `[protocol]`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtocolSection {
    pub length_width: WidthSetting,
}

/// Length field width as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthSetting {
    /// 2-byte length
    Narrow,
    /// 4-byte length
    #[default]
    Wide,
}

impl From<WidthSetting> for LengthWidth {
    fn from(setting: WidthSetting) -> Self {
        match setting {
            WidthSetting::Narrow => LengthWidth::Narrow,
            WidthSetting::Wide => LengthWidth::Wide,
        }
    }
}

/// `[transport]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransportSection {
    pub chunk_size: usize,
}

impl Default for TransportSection {
    fn default() -> Self {
        Self { chunk_size: 4096 }
    }
}

/// `[diagnostics]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsSection {
    pub dump_threshold: usize,
    pub dump_prefix: usize,
}

impl Default for DiagnosticsSection {
    fn default() -> Self {
        let limits = DumpLimits::default();
        Self {
            dump_threshold: limits.threshold,
            dump_prefix: limits.prefix,
        }
    }
}

/// `[session]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSection {
    /// Image drawn by the image action
    pub image: String,
    /// Pause between steps of the test program
    pub pause_ms: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            image: String::from("test.bmp"),
            pause_ms: 500,
        }
    }
}

impl HostConfig {
    /// Serial line settings
    pub fn serial_config(&self) -> Result<SerialConfig, ConfigError> {
        let data_bits = DataBits::from_count(self.serial.data_bits).ok_or(ConfigError::Invalid {
            field: "serial.data_bits",
            reason: "must be 5, 6, 7 or 8",
        })?;
        let stop_bits = StopBits::from_count(self.serial.stop_bits).ok_or(ConfigError::Invalid {
            field: "serial.stop_bits",
            reason: "must be 1 or 2",
        })?;

        Ok(SerialConfig {
            baudrate: self.serial.baud,
            data_bits,
            parity: self.serial.parity.into(),
            stop_bits,
        })
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.serial.timeout_ms)
    }

    pub fn length_width(&self) -> LengthWidth {
        self.protocol.length_width.into()
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            chunk_size: self.transport.chunk_size,
            dump: DumpLimits {
                threshold: self.diagnostics.dump_threshold,
                prefix: self.diagnostics.dump_prefix,
            },
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            image_path: self.session.image.clone(),
            pause: Duration::from_millis(self.session.pause_ms),
        }
    }
}
