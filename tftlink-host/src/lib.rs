//! Host side of the tftlink display link
//!
//! This crate owns everything that touches the operating system:
//!
//! - Transport driver writing framed packets to a serial channel
//! - OS serial port channel (via `serialport`)
//! - Image file decoding (via the `image` crate)
//! - TOML configuration
//! - The session context and interactive test menu used by the `tftlink`
//!   binary
//!
//! Packet encoding lives in `tftlink-protocol`; this crate only moves the
//! bytes.

#![deny(unsafe_code)]

pub mod config;
pub mod image_source;
pub mod menu;
pub mod serial;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ConfigError, HostConfig, Overrides};
pub use image_source::{FileImageSource, ImageLoadError};
pub use menu::Action;
pub use serial::{SerialPortChannel, SerialPortProvider};
pub use session::{Session, SessionError, SessionSettings};
pub use transport::{ChannelProvider, PacketDump, TransportConfig, TransportDriver, TransportError};
