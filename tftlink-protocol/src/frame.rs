//! Packet framing for the display protocol.
//!
//! Frame format:
//! - STX (1 byte): 0x02 start marker
//! - TYPE (1 byte): command type, the first element of the parameter sequence
//! - LENGTH (2 or 4 bytes): big-endian count of the bytes after TYPE
//! - PAYLOAD (LENGTH bytes): remaining parameter bytes, verbatim
//! - ETX (1 byte): 0x03 end marker
//!
//! There is no checksum; the serial link is trusted.

use alloc::vec::Vec;

use crate::field::{high_byte, high_word_high_byte, high_word_low_byte, low_byte};

/// Frame start marker
pub const STX: u8 = 0x02;

/// Frame end marker
pub const ETX: u8 = 0x03;

/// Errors that can occur while framing a parameter sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Parameter sequence has no type byte
    EmptyParameters,
    /// Payload does not fit the configured length field
    LengthOverflow,
    /// Buffer too small for encoding
    BufferTooSmall,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::EmptyParameters => f.write_str("parameter sequence is empty"),
            FrameError::LengthOverflow => f.write_str("payload too large for length field"),
            FrameError::BufferTooSmall => f.write_str("buffer too small for frame"),
        }
    }
}

impl core::error::Error for FrameError {}

/// Width of the LENGTH field
///
/// Controllers only understand the width they were built for, so this is
/// chosen per deployment, never negotiated on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LengthWidth {
    /// 2-byte length (revision-2 controllers)
    Narrow,
    /// 4-byte length
    #[default]
    Wide,
}

impl LengthWidth {
    /// Number of bytes in the length field
    pub const fn bytes(self) -> usize {
        match self {
            LengthWidth::Narrow => 2,
            LengthWidth::Wide => 4,
        }
    }

    /// Largest payload the length field can describe
    pub const fn max_payload(self) -> usize {
        match self {
            LengthWidth::Narrow => u16::MAX as usize,
            LengthWidth::Wide => u32::MAX as usize,
        }
    }

    fn write(self, size: u32, out: &mut [u8]) {
        match self {
            LengthWidth::Narrow => {
                out[0] = high_byte(size);
                out[1] = low_byte(size);
            }
            LengthWidth::Wide => {
                out[0] = high_word_high_byte(size);
                out[1] = high_word_low_byte(size);
                out[2] = high_byte(size);
                out[3] = low_byte(size);
            }
        }
    }
}

/// Header bytes that precede the payload: STX, TYPE and LENGTH
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    bytes: [u8; 6],
    len: usize,
}

impl Header {
    fn new(kind: u8, payload_len: usize, width: LengthWidth) -> Result<Self, FrameError> {
        if payload_len > width.max_payload() {
            return Err(FrameError::LengthOverflow);
        }
        let size = u32::try_from(payload_len).map_err(|_| FrameError::LengthOverflow)?;

        let mut bytes = [0u8; 6];
        bytes[0] = STX;
        bytes[1] = kind;
        width.write(size, &mut bytes[2..]);

        Ok(Self {
            bytes,
            len: 2 + width.bytes(),
        })
    }

    fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Total frame size for a parameter sequence of `params_len` bytes
///
/// `params_len` includes the type byte.
pub const fn encoded_len(params_len: usize, width: LengthWidth) -> usize {
    // STX + LENGTH + params + ETX
    1 + width.bytes() + params_len + 1
}

fn split_params(params: &[u8]) -> Result<(u8, &[u8]), FrameError> {
    params
        .split_first()
        .map(|(kind, payload)| (*kind, payload))
        .ok_or(FrameError::EmptyParameters)
}

/// Frame a parameter sequence into a new packet
///
/// `params[0]` is the command type; LENGTH is `params.len() - 1`.
pub fn frame(params: &[u8], width: LengthWidth) -> Result<Vec<u8>, FrameError> {
    let (kind, payload) = split_params(params)?;
    let header = Header::new(kind, payload.len(), width)?;

    let mut packet = Vec::with_capacity(encoded_len(params.len(), width));
    packet.extend_from_slice(header.as_slice());
    packet.extend_from_slice(payload);
    packet.push(ETX);
    Ok(packet)
}

/// Frame a parameter sequence into a caller-supplied buffer
///
/// Returns the number of bytes written
pub fn encode_into(params: &[u8], width: LengthWidth, buffer: &mut [u8]) -> Result<usize, FrameError> {
    let (kind, payload) = split_params(params)?;
    let header = Header::new(kind, payload.len(), width)?;

    let frame_len = encoded_len(params.len(), width);
    if buffer.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    let head = header.as_slice();
    buffer[..head.len()].copy_from_slice(head);
    buffer[head.len()..head.len() + payload.len()].copy_from_slice(payload);
    buffer[frame_len - 1] = ETX;

    Ok(frame_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use proptest::prelude::*;

    /// Read LENGTH back out of a framed packet
    fn decode_length(packet: &[u8], width: LengthWidth) -> usize {
        packet[2..2 + width.bytes()]
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize)
    }

    #[test]
    fn test_frame_clear_narrow() {
        let packet = frame(&[3], LengthWidth::Narrow).unwrap();
        assert_eq!(packet, vec![0x02, 0x03, 0x00, 0x00, 0x03]);
    }

    #[test]
    fn test_frame_clear_wide() {
        let packet = frame(&[3], LengthWidth::Wide).unwrap();
        assert_eq!(packet, vec![0x02, 0x03, 0x00, 0x00, 0x00, 0x00, 0x03]);
    }

    #[test]
    fn test_frame_with_payload() {
        let packet = frame(&[4, 0x2A, 0, 0, 0, 100], LengthWidth::Wide).unwrap();
        assert_eq!(
            packet,
            vec![0x02, 0x04, 0x00, 0x00, 0x00, 0x05, 0x2A, 0, 0, 0, 100, 0x03]
        );
    }

    #[test]
    fn test_empty_parameters_rejected() {
        assert_eq!(frame(&[], LengthWidth::Wide), Err(FrameError::EmptyParameters));
        let mut buffer = [0u8; 8];
        assert_eq!(
            encode_into(&[], LengthWidth::Narrow, &mut buffer),
            Err(FrameError::EmptyParameters)
        );
    }

    #[test]
    fn test_narrow_overflow_is_checked() {
        let mut params = vec![1u8];
        params.resize(1 + 65_536, 0);
        assert_eq!(frame(&params, LengthWidth::Narrow), Err(FrameError::LengthOverflow));

        // Exactly 0xFFFF still fits
        params.truncate(1 + 65_535);
        let packet = frame(&params, LengthWidth::Narrow).unwrap();
        assert_eq!(&packet[2..4], &[0xFF, 0xFF]);
    }

    #[test]
    fn test_wide_carries_large_payload() {
        let mut params = vec![1u8];
        params.resize(1 + 153_608, 0xAB);
        let packet = frame(&params, LengthWidth::Wide).unwrap();
        assert_eq!(decode_length(&packet, LengthWidth::Wide), 153_608);
        assert_eq!(packet.len(), encoded_len(params.len(), LengthWidth::Wide));
    }

    #[test]
    fn test_encode_into_matches_frame() {
        let params = [0u8, 0, 100, 0, 100, 0, 200, 0, 200, 0xF8, 0];
        let mut buffer = [0u8; 32];
        let len = encode_into(&params, LengthWidth::Narrow, &mut buffer).unwrap();
        assert_eq!(&buffer[..len], frame(&params, LengthWidth::Narrow).unwrap().as_slice());
    }

    #[test]
    fn test_encode_into_buffer_too_small() {
        let mut buffer = [0u8; 4];
        assert_eq!(
            encode_into(&[3], LengthWidth::Narrow, &mut buffer),
            Err(FrameError::BufferTooSmall)
        );
    }

    fn any_width() -> impl Strategy<Value = LengthWidth> {
        prop_oneof![Just(LengthWidth::Narrow), Just(LengthWidth::Wide)]
    }

    proptest! {
        #[test]
        fn prop_frame_is_bracketed(
            params in proptest::collection::vec(any::<u8>(), 1..512),
            width in any_width(),
        ) {
            let packet = frame(&params, width).unwrap();
            prop_assert_eq!(packet[0], STX);
            prop_assert_eq!(packet[1], params[0]);
            prop_assert_eq!(*packet.last().unwrap(), ETX);
            prop_assert_eq!(packet.len(), encoded_len(params.len(), width));
        }

        #[test]
        fn prop_length_field_recovers_payload(
            params in proptest::collection::vec(any::<u8>(), 1..512),
            width in any_width(),
        ) {
            let packet = frame(&params, width).unwrap();
            let len = decode_length(&packet, width);
            prop_assert_eq!(len, params.len() - 1);

            let start = 2 + width.bytes();
            prop_assert_eq!(&packet[start..start + len], &params[1..]);
        }
    }
}
