//! Decoder configuration.
//!
//! The default configuration only enforces the framing rules every decoder
//! needs: continuation ordering, unfragmented control frames and the 63-bit
//! payload length limit. The remaining RFC 6455 section 5 checks depend on
//! the connection's role and negotiated extensions, so they are opt-in.

use serde::{Deserialize, Serialize};

/// Control frame payload limit from RFC 6455 section 5.5.
pub const MAX_CONTROL_PAYLOAD: u64 = 125;

/// Expected state of the MASK bit on incoming frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskingPolicy {
    /// Accept masked and unmasked frames
    #[default]
    Any,
    /// Every frame must be masked (server reading from a client)
    Required,
    /// No frame may be masked (client reading from a server)
    Forbidden,
}

/// Frame decoder configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Fail on any RSV bit. Leave off when an extension uses them.
    pub reject_reserved_bits: bool,
    /// Fail on opcodes 0x3-0x7 and 0xB-0xF
    pub reject_unknown_opcodes: bool,
    /// Largest control frame payload to accept
    pub max_control_payload: Option<u64>,
    /// MASK bit expectation
    pub masking: MaskingPolicy,
}

impl DecoderConfig {
    /// Configuration with every RFC 6455 section 5 check turned on
    pub fn strict() -> Self {
        Self {
            reject_reserved_bits: true,
            reject_unknown_opcodes: true,
            max_control_payload: Some(MAX_CONTROL_PAYLOAD),
            masking: MaskingPolicy::Any,
        }
    }

    /// Strict configuration for a server decoding client frames
    pub fn server() -> Self {
        Self::strict().with_masking(MaskingPolicy::Required)
    }

    /// Strict configuration for a client decoding server frames
    pub fn client() -> Self {
        Self::strict().with_masking(MaskingPolicy::Forbidden)
    }

    /// Set the masking policy
    pub fn with_masking(mut self, masking: MaskingPolicy) -> Self {
        self.masking = masking;
        self
    }

    /// Set whether RSV bits are rejected
    pub fn with_reject_reserved_bits(mut self, reject: bool) -> Self {
        self.reject_reserved_bits = reject;
        self
    }
}
