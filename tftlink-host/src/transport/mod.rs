//! Serial transport driver
//!
//! Writes framed packets to a channel it owns exclusively. A driver only
//! exists once its channel is open; there is no reopen, and the channel is
//! released when the driver is dropped.
//!
//! Transmission is blocking and fire-and-forget: nothing is read back, and
//! write errors are handed to the caller without retry.

mod dump;

use std::io;
use std::time::{Duration, Instant};

use log::{debug, info, trace};
use tftlink_hal::{SerialConfig, SerialTx};
use tftlink_protocol::Command;

pub use dump::{DumpLimits, PacketDump};

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The channel could not be acquired; no driver was created
    #[error("channel {address} unavailable: {source}")]
    ChannelUnavailable {
        address: String,
        #[source]
        source: io::Error,
    },
    /// The channel failed while writing a packet
    #[error("channel write failed: {0}")]
    ChannelWrite(#[source] io::Error),
}

/// Opens channels by address
///
/// Device discovery, flow-control lines and reconnection are out of scope;
/// a provider either hands back an open channel or fails.
pub trait ChannelProvider {
    /// Channel type produced by this provider
    type Channel: SerialTx<Error = io::Error>;

    /// Open the channel at `address` with the given line settings
    fn open(&self, address: &str, config: &SerialConfig) -> io::Result<Self::Channel>;
}

/// Driver tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Largest single write handed to the channel
    pub chunk_size: usize,
    /// Diagnostic dump limits
    pub dump: DumpLimits,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4096,
            dump: DumpLimits::default(),
        }
    }
}

/// Transport driver over an open channel
pub struct TransportDriver<C> {
    channel: C,
    config: TransportConfig,
}

impl<C> TransportDriver<C>
where
    C: SerialTx<Error = io::Error>,
{
    /// Wrap an already open channel
    pub fn new(channel: C, config: TransportConfig) -> Self {
        Self { channel, config }
    }

    /// Open a channel through `provider` and wrap it
    pub fn open<P>(
        provider: &P,
        address: &str,
        serial: &SerialConfig,
        config: TransportConfig,
    ) -> Result<Self, TransportError>
    where
        P: ChannelProvider<Channel = C>,
    {
        let channel = provider
            .open(address, serial)
            .map_err(|source| TransportError::ChannelUnavailable {
                address: address.to_string(),
                source,
            })?;

        info!("{} is opened at {} baud", address, serial.baudrate);
        Ok(Self::new(channel, config))
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Borrow the underlying channel
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Consume the driver and return the underlying channel
    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Transmit a command's packet
    ///
    /// Logs the description, the packet dump and the elapsed time, and
    /// returns the time spent writing.
    pub fn transmit(&mut self, command: &Command) -> Result<Duration, TransportError> {
        let packet = command.packet();
        info!("Sending command: {}", command.description());
        info!("Packet (hex): {}", PacketDump::new(packet, self.config.dump));

        let elapsed = self.transmit_packet(packet)?;
        info!("Sent {} bytes in {:?}", packet.len(), elapsed);
        Ok(elapsed)
    }

    /// Transmit pre-framed bytes
    ///
    /// The whole packet is written before this returns; on error the caller
    /// cannot tell how much of it reached the channel.
    pub fn transmit_packet(&mut self, packet: &[u8]) -> Result<Duration, TransportError> {
        let start = Instant::now();
        self.write_packet(packet)
            .map_err(TransportError::ChannelWrite)?;
        Ok(start.elapsed())
    }

    fn write_packet(&mut self, packet: &[u8]) -> io::Result<()> {
        let chunk_size = self.config.chunk_size.max(1);

        if packet.len() <= chunk_size {
            self.channel.write_all(packet)?;
        } else {
            let chunks = packet.len().div_ceil(chunk_size);
            debug!("Writing {} bytes in {} chunks", packet.len(), chunks);
            for (i, chunk) in packet.chunks(chunk_size).enumerate() {
                self.channel.write_all(chunk)?;
                trace!("Chunk {}/{} written ({} bytes)", i + 1, chunks, chunk.len());
            }
        }

        self.channel.flush()
    }
}
