//! WebSocket frame opcodes (RFC 6455 section 5.2).

/// Continuation frame opcode.
pub const CONTINUATION: u8 = 0x0;
/// Text frame opcode.
pub const TEXT: u8 = 0x1;
/// Binary frame opcode.
pub const BINARY: u8 = 0x2;
/// Connection close opcode.
pub const CLOSE: u8 = 0x8;
/// Ping opcode.
pub const PING: u8 = 0x9;
/// Pong opcode.
pub const PONG: u8 = 0xA;

/// Returns true if `opcode` belongs to the data range (0x0-0x7).
///
/// The most significant bit of the 4-bit opcode separates control frames
/// from data frames.
#[inline]
pub const fn is_data(opcode: u8) -> bool {
    opcode & 0x08 == 0
}

/// Returns true if `opcode` belongs to the control range (0x8-0xF).
#[inline]
pub const fn is_control(opcode: u8) -> bool {
    !is_data(opcode)
}

/// WebSocket frame opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Continuation frame (0x0)
    Continuation,
    /// Text frame (0x1)
    Text,
    /// Binary frame (0x2)
    Binary,
    /// Connection close (0x8)
    Close,
    /// Ping (0x9)
    Ping,
    /// Pong (0xA)
    Pong,
    /// Reserved/unknown opcode
    Reserved(u8),
}

impl Opcode {
    /// Parse opcode from the low nibble of `value`
    pub const fn from_u8(value: u8) -> Self {
        match value & 0x0F {
            CONTINUATION => Self::Continuation,
            TEXT => Self::Text,
            BINARY => Self::Binary,
            CLOSE => Self::Close,
            PING => Self::Ping,
            PONG => Self::Pong,
            other => Self::Reserved(other),
        }
    }

    /// Convert to byte value
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Continuation => CONTINUATION,
            Self::Text => TEXT,
            Self::Binary => BINARY,
            Self::Close => CLOSE,
            Self::Ping => PING,
            Self::Pong => PONG,
            Self::Reserved(v) => v,
        }
    }

    /// Convert to string representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Continuation => "continuation",
            Self::Text => "text",
            Self::Binary => "binary",
            Self::Close => "close",
            Self::Ping => "ping",
            Self::Pong => "pong",
            Self::Reserved(_) => "reserved",
        }
    }

    /// Check if this is a control frame opcode (including reserved 0xB-0xF)
    pub const fn is_control(self) -> bool {
        is_control(self.as_u8())
    }

    /// Check if this is a data frame opcode (including reserved 0x3-0x7)
    pub const fn is_data(self) -> bool {
        is_data(self.as_u8())
    }

    /// Check if this opcode is one RFC 6455 defines
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Reserved(_))
    }
}

impl From<u8> for Opcode {
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode.as_u8()
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reserved(v) => write!(f, "reserved(0x{v:X})"),
            other => f.write_str(other.as_str()),
        }
    }
}
