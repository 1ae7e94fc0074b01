//! Hex rendering of packets for diagnostics
//!
//! Image and raw packets run to tens of thousands of bytes, so long packets
//! are shown as a prefix, an elision marker and the final byte.

use std::fmt;

/// Limits for packet dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpLimits {
    /// Packets shorter than this are dumped in full
    pub threshold: usize,
    /// Bytes shown before the elision marker on longer packets
    pub prefix: usize,
}

impl Default for DumpLimits {
    fn default() -> Self {
        Self {
            threshold: 50,
            prefix: 50,
        }
    }
}

/// Displays a packet as comma-separated hex bytes
pub struct PacketDump<'a> {
    packet: &'a [u8],
    limits: DumpLimits,
}

impl<'a> PacketDump<'a> {
    pub fn new(packet: &'a [u8], limits: DumpLimits) -> Self {
        Self { packet, limits }
    }

    /// True if the dump leaves bytes out
    pub fn is_elided(&self) -> bool {
        self.packet.len() >= self.limits.threshold && self.shown() + 1 < self.packet.len()
    }

    fn shown(&self) -> usize {
        self.limits.prefix.min(self.packet.len().saturating_sub(1))
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{:02x}", byte)?;
    }
    Ok(())
}

impl fmt::Display for PacketDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_elided() {
            return write_hex(f, self.packet);
        }

        let shown = self.shown();
        let elided = self.packet.len() - shown - 1;
        write_hex(f, &self.packet[..shown])?;
        write!(f, ", data... ({} bytes), ", elided)?;
        // is_elided() guarantees a final byte past the prefix
        write!(f, "{:02x}", self.packet[self.packet.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_packet_in_full() {
        let dump = PacketDump::new(&[0x02, 0x03, 0x00, 0x00, 0x03], DumpLimits::default());
        assert!(!dump.is_elided());
        assert_eq!(dump.to_string(), "02, 03, 00, 00, 03");
    }

    #[test]
    fn test_long_packet_elided() {
        let mut packet = vec![0x02, 0x04, 0x00, 0x00, 0x4E, 0x22, 0x2C];
        packet.extend(std::iter::repeat(0xF8).take(20_000));
        packet.push(0x03);

        let limits = DumpLimits {
            threshold: 50,
            prefix: 8,
        };
        let dump = PacketDump::new(&packet, limits);
        assert!(dump.is_elided());
        assert_eq!(
            dump.to_string(),
            format!(
                "02, 04, 00, 00, 4e, 22, 2c, f8, data... ({} bytes), 03",
                packet.len() - 9
            )
        );
    }

    #[test]
    fn test_threshold_boundary() {
        let limits = DumpLimits {
            threshold: 4,
            prefix: 2,
        };
        assert!(!PacketDump::new(&[1, 2, 3], limits).is_elided());
        assert_eq!(PacketDump::new(&[1, 2, 3, 4], limits).to_string(), "01, 02, data... (1 bytes), 04");
    }

    #[test]
    fn test_prefix_covering_packet_shows_everything() {
        let limits = DumpLimits {
            threshold: 2,
            prefix: 10,
        };
        assert_eq!(PacketDump::new(&[1, 2, 3], limits).to_string(), "01, 02, 03");
    }

    #[test]
    fn test_empty_packet() {
        assert_eq!(PacketDump::new(&[], DumpLimits::default()).to_string(), "");
    }
}
