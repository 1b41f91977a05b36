//! Decoded frame metadata.

use crate::opcode::{self, Opcode};

/// Full contents of a WebSocket frame, excluding the payload.
///
/// A header is handed out once per frame, after the non-payload portion
/// (2 to 14 bytes on the wire) has been parsed and validated. Exactly
/// `payload_length` payload bytes follow it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    /// FIN bit - true if this is the final frame of a message
    pub fin: bool,
    /// RSV1, RSV2 and RSV3, reported as-is
    pub reserved: [bool; 3],
    /// MASK bit - true if the payload was XOR-masked on the wire
    pub masked: bool,
    /// Raw 4-bit opcode
    pub opcode: u8,
    /// Number of payload bytes in this frame
    pub payload_length: u64,
    /// Masking key; all zero when `masked` is false
    pub masking_key: [u8; 4],
}

impl FrameHeader {
    /// Typed view of the opcode
    pub const fn kind(&self) -> Opcode {
        Opcode::from_u8(self.opcode)
    }

    /// Check if this is a control frame
    pub const fn is_control(&self) -> bool {
        opcode::is_control(self.opcode)
    }

    /// Check if this is a data frame
    pub const fn is_data(&self) -> bool {
        opcode::is_data(self.opcode)
    }

    /// Reserved bits packed as they appear in the first header byte (RSV1 = 0b100).
    pub const fn reserved_bits(&self) -> u8 {
        ((self.reserved[0] as u8) << 2) | ((self.reserved[1] as u8) << 1) | self.reserved[2] as u8
    }

    /// Number of bytes this header occupied on the wire.
    pub const fn header_len(&self) -> usize {
        let length_field = match self.payload_length {
            0..=125 => 0,
            126..=0xFFFF => 2,
            _ => 8,
        };
        2 + length_field + if self.masked { 4 } else { 0 }
    }
}
