//! Configuration loading
//!
//! Reads `tftlink.toml`, applies command-line overrides and validates the
//! result. A missing file is not an error: defaults are used.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{HostConfig, WidthSetting};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File exists but could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// TOML syntax or type error
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Value out of range
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Command-line overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub port: Option<String>,
    pub baud: Option<u32>,
    /// Force the 2-byte length field
    pub narrow: bool,
    pub image: Option<String>,
}

/// Parse configuration text
pub fn parse(input: &str) -> Result<HostConfig, ConfigError> {
    let config: HostConfig = toml::from_str(input)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from `path`, falling back to defaults if it does not exist
pub fn load(path: &Path) -> Result<HostConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No config at {}, using defaults", path.display());
            return Ok(HostConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = parse(&text)?;
    info!("Loaded configuration from {}", path.display());
    log_config_summary(&config);
    Ok(config)
}

impl HostConfig {
    /// Apply command-line overrides and re-validate
    pub fn apply(&mut self, overrides: &Overrides) -> Result<(), ConfigError> {
        if let Some(port) = &overrides.port {
            self.serial.port = port.clone();
        }
        if let Some(baud) = overrides.baud {
            self.serial.baud = baud;
        }
        if overrides.narrow {
            self.protocol.length_width = WidthSetting::Narrow;
        }
        if let Some(image) = &overrides.image {
            self.session.image = image.clone();
        }
        validate(self)
    }
}

fn validate(config: &HostConfig) -> Result<(), ConfigError> {
    if config.serial.port.is_empty() {
        return Err(ConfigError::Invalid {
            field: "serial.port",
            reason: "must not be empty",
        });
    }
    if config.serial.baud == 0 {
        return Err(ConfigError::Invalid {
            field: "serial.baud",
            reason: "must be greater than zero",
        });
    }
    if config.transport.chunk_size == 0 {
        return Err(ConfigError::Invalid {
            field: "transport.chunk_size",
            reason: "must be greater than zero",
        });
    }
    if config.diagnostics.dump_prefix == 0 {
        return Err(ConfigError::Invalid {
            field: "diagnostics.dump_prefix",
            reason: "must be greater than zero",
        });
    }
    // Catches bad data/stop bit counts before the port is opened
    config.serial_config()?;
    Ok(())
}

fn log_config_summary(config: &HostConfig) {
    debug!(
        "  serial: {} at {} baud",
        config.serial.port, config.serial.baud
    );
    debug!("  length field: {:?}", config.protocol.length_width);
    debug!("  chunk size: {} bytes", config.transport.chunk_size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParitySetting;
    use tftlink_hal::{Parity, StopBits};
    use tftlink_protocol::LengthWidth;

    #[test]
    fn test_empty_is_default() {
        let config = parse("").unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.serial.baud, 460800);
        assert_eq!(config.length_width(), LengthWidth::Wide);
    }

    #[test]
    fn test_full_file() {
        let config = parse(
            r#"
            [serial]
            port = "COM3"
            baud = 115200
            parity = "even"
            stop_bits = 2

            [protocol]
            length_width = "narrow"

            [transport]
            chunk_size = 512

            [diagnostics]
            dump_threshold = 20
            dump_prefix = 14

            [session]
            image = "logo.png"
            pause_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.serial.port, "COM3");
        assert_eq!(config.serial.parity, ParitySetting::Even);
        let serial = config.serial_config().unwrap();
        assert_eq!(serial.baudrate, 115200);
        assert_eq!(serial.parity, Parity::Even);
        assert_eq!(serial.stop_bits, StopBits::Two);

        assert_eq!(config.length_width(), LengthWidth::Narrow);

        let transport = config.transport_config();
        assert_eq!(transport.chunk_size, 512);
        assert_eq!(transport.dump.threshold, 20);
        assert_eq!(transport.dump.prefix, 14);

        let session = config.session_settings();
        assert_eq!(session.image_path, "logo.png");
        assert!(session.pause.is_zero());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = parse("[serial]\nspeed = 9600\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            parse("[serial]\nbaud = 0\n"),
            Err(ConfigError::Invalid { field: "serial.baud", .. })
        ));
        assert!(matches!(
            parse("[serial]\ndata_bits = 9\n"),
            Err(ConfigError::Invalid { field: "serial.data_bits", .. })
        ));
        assert!(matches!(
            parse("[transport]\nchunk_size = 0\n"),
            Err(ConfigError::Invalid { field: "transport.chunk_size", .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = HostConfig::default();
        config
            .apply(&Overrides {
                port: Some(String::from("COM7")),
                baud: Some(921600),
                narrow: true,
                image: Some(String::from("splash.bmp")),
            })
            .unwrap();

        assert_eq!(config.serial.port, "COM7");
        assert_eq!(config.serial.baud, 921600);
        assert_eq!(config.length_width(), LengthWidth::Narrow);
        assert_eq!(config.session.image, "splash.bmp");
    }

    #[test]
    fn test_override_revalidates() {
        let mut config = HostConfig::default();
        let result = config.apply(&Overrides {
            baud: Some(0),
            ..Overrides::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_sample_file_matches_defaults() {
        let config = parse(include_str!("../../tftlink.toml")).unwrap();
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("tftlink-no-such-config.toml");
        let config = load(&path).unwrap();
        assert_eq!(config, HostConfig::default());
    }
}
