//! Incremental WebSocket frame decoder (RFC 6455).
//!
//! Decodes the framing layer of a WebSocket byte stream that arrives in
//! arbitrarily sized pieces, producing frame headers and unmasked payload
//! chunks without buffering payload data.
//!
//! # Module Organization
//!
//! - [`decoder`]: The [`Decoder`] state machine and its [`Event`]s
//! - [`handler`]: Callback adapter ([`FrameHandler`], [`CallbackDecoder`])
//! - [`frame`]: [`FrameHeader`] metadata
//! - [`opcode`]: Opcode constants and the [`Opcode`] enum
//! - [`mask`]: XOR masking
//! - [`config`]: Opt-in protocol checks
//! - [`error`]: Error types and result aliases
//!
//! # Example
//!
//! ```
//! use wsframe_decoder::{Decoder, Event};
//!
//! let mut decoder = Decoder::new();
//! let mut bytes = [0x81, 0x05, b'H', b'e', b'l', b'l', b'o'];
//! let mut cursor: &mut [u8] = &mut bytes;
//!
//! let event = decoder.process(&mut cursor).unwrap();
//! assert_eq!(event.header().unwrap().payload_length, 5);
//!
//! match decoder.process(&mut cursor).unwrap() {
//!     Event::Payload { data, frame_complete } => {
//!         assert_eq!(data, b"Hello");
//!         assert!(frame_complete);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod handler;
pub mod mask;
pub mod opcode;

pub use config::{DecoderConfig, MaskingPolicy};
pub use decoder::{Decoder, Event};
pub use error::{BoxError, DecodeError, DecodeResult, ErrorKind};
pub use frame::FrameHeader;
pub use handler::{CallbackDecoder, FrameHandler};
pub use mask::apply_mask;
pub use opcode::Opcode;
