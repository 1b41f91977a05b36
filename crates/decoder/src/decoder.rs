//! Incremental frame decoder state machine.
//!
//! The decoder walks each frame through a fixed sequence of stages:
//!
//! ```text
//! OpcodeByte -> LengthByte -> [ExtendedLength] -> MaskingKeyCheck -> [MaskingKey]
//!            -> PayloadCheck -> [Payload] -> Done -> OpcodeByte ...
//! ```
//!
//! Byte-consuming stages take whatever input is available and keep partial
//! progress across calls, so input may be split at any byte offset. The two
//! check stages consume nothing. A call to [`Decoder::process`] returns as
//! soon as it has an event to report (a header or one payload chunk) or runs
//! out of input, which lets the caller act on each event before feeding more
//! bytes. Payload bytes are never buffered; only up to 8 header bytes are.

use bytes::{Bytes, BytesMut};
use tracing::{trace, warn};

use crate::config::{DecoderConfig, MaskingPolicy};
use crate::error::{DecodeError, DecodeResult};
use crate::frame::FrameHeader;
use crate::mask::apply_mask;
use crate::opcode;

/// Widest multi-byte header field (64-bit extended length).
const SCRATCH_LEN: usize = 8;
const MASKING_KEY_LEN: usize = 4;

/// Outcome of a single [`Decoder::process`] call.
///
/// `P` is the payload chunk type: a borrowed slice of the caller's buffer for
/// [`Decoder::process`], or [`Bytes`] for [`Decoder::process_buf`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<P> {
    /// All input was consumed without completing a header or reading payload
    NeedMore,
    /// A frame header was decoded
    Header {
        header: FrameHeader,
        /// Set when the frame has no payload and is therefore finished
        frame_complete: bool,
    },
    /// A chunk of (unmasked) payload was decoded
    Payload {
        data: P,
        /// Set when this chunk ends the frame
        frame_complete: bool,
    },
}

impl<P> Event<P> {
    /// True when this call finished the current frame
    pub fn is_frame_complete(&self) -> bool {
        match self {
            Self::NeedMore => false,
            Self::Header { frame_complete, .. } | Self::Payload { frame_complete, .. } => {
                *frame_complete
            }
        }
    }

    /// Decoded header, if this is a header event
    pub fn header(&self) -> Option<&FrameHeader> {
        match self {
            Self::Header { header, .. } => Some(header),
            _ => None,
        }
    }
}

/// Position in the decode state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    OpcodeByte,
    LengthByte,
    ExtendedLength { width: usize },
    MaskingKeyCheck,
    MaskingKey,
    PayloadCheck,
    Payload,
    Done,
}

/// Fixed-size cache for header fields that may be split across calls.
#[derive(Debug, Default)]
struct Scratch {
    buf: [u8; SCRATCH_LEN],
    filled: usize,
}

impl Scratch {
    fn reset(&mut self) {
        self.filled = 0;
    }

    /// Copy bytes from the front of `input` until `width` bytes are cached.
    /// Returns how many bytes were taken.
    fn fill(&mut self, input: &[u8], width: usize) -> usize {
        let take = (width - self.filled).min(input.len());
        self.buf[self.filled..self.filled + take].copy_from_slice(&input[..take]);
        self.filled += take;
        take
    }

    fn is_complete(&self, width: usize) -> bool {
        self.filled == width
    }

    fn bytes(&self) -> &[u8] {
        &self.buf[..self.filled]
    }
}

/// What a step produced, without borrowing the input.
enum Step {
    NeedMore,
    Header {
        header: FrameHeader,
        frame_complete: bool,
    },
    Payload {
        start: usize,
        len: usize,
        frame_complete: bool,
    },
}

/// Live decoding state for one byte stream.
#[derive(Debug)]
struct Machine {
    stage: Stage,
    scratch: Scratch,
    current: FrameHeader,
    continuation_expected: bool,
    payload_remaining: u64,
    masking_position: u64,
}

impl Machine {
    fn new() -> Self {
        Self {
            stage: Stage::OpcodeByte,
            scratch: Scratch::default(),
            current: FrameHeader::default(),
            continuation_expected: false,
            payload_remaining: 0,
            masking_position: 0,
        }
    }

    /// Advance through as many stages as `input` allows, stopping after the
    /// first event. Returns the number of bytes consumed from the front of
    /// `input`; a payload chunk is unmasked in place.
    fn step(&mut self, config: &DecoderConfig, input: &mut [u8]) -> DecodeResult<(usize, Step)> {
        let mut pos = 0;

        loop {
            match self.stage {
                Stage::Done => {
                    self.current = FrameHeader::default();
                    self.stage = Stage::OpcodeByte;
                }

                Stage::OpcodeByte => {
                    let Some(&byte) = input.get(pos) else {
                        return Ok((pos, Step::NeedMore));
                    };
                    pos += 1;
                    self.read_opcode_byte(config, byte)?;
                    self.stage = Stage::LengthByte;
                }

                Stage::LengthByte => {
                    let Some(&byte) = input.get(pos) else {
                        return Ok((pos, Step::NeedMore));
                    };
                    pos += 1;
                    self.read_length_byte(config, byte)?;
                }

                Stage::ExtendedLength { width } => {
                    pos += self.scratch.fill(&input[pos..], width);
                    if !self.scratch.is_complete(width) {
                        return Ok((pos, Step::NeedMore));
                    }

                    let length = self
                        .scratch
                        .bytes()
                        .iter()
                        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));

                    // RFC 6455 section 5.2: the most significant bit MUST be 0
                    if width == 8 && length >> 63 != 0 {
                        return Err(DecodeError::LengthMsbSet { length });
                    }

                    self.set_payload_length(config, length)?;
                    self.stage = Stage::MaskingKeyCheck;
                }

                Stage::MaskingKeyCheck => {
                    if self.current.masked {
                        self.scratch.reset();
                        self.stage = Stage::MaskingKey;
                    } else {
                        self.current.masking_key = [0; MASKING_KEY_LEN];
                        self.stage = Stage::PayloadCheck;
                    }
                }

                Stage::MaskingKey => {
                    pos += self.scratch.fill(&input[pos..], MASKING_KEY_LEN);
                    if !self.scratch.is_complete(MASKING_KEY_LEN) {
                        return Ok((pos, Step::NeedMore));
                    }
                    self.current.masking_key.copy_from_slice(self.scratch.bytes());
                    self.stage = Stage::PayloadCheck;
                }

                Stage::PayloadCheck => {
                    let header = self.current;

                    trace!(
                        fin = header.fin,
                        opcode = %header.kind(),
                        masked = header.masked,
                        payload_length = header.payload_length,
                        "Decoded WebSocket frame header"
                    );

                    if header.payload_length == 0 {
                        self.complete_frame();
                        return Ok((
                            pos,
                            Step::Header {
                                header,
                                frame_complete: true,
                            },
                        ));
                    }

                    self.payload_remaining = header.payload_length;
                    self.masking_position = 0;
                    self.stage = Stage::Payload;
                    return Ok((
                        pos,
                        Step::Header {
                            header,
                            frame_complete: false,
                        },
                    ));
                }

                Stage::Payload => {
                    let available = input.len() - pos;
                    if available == 0 {
                        return Ok((pos, Step::NeedMore));
                    }

                    let len = match usize::try_from(self.payload_remaining) {
                        Ok(remaining) => remaining.min(available),
                        Err(_) => available,
                    };

                    let start = pos;
                    if self.current.masked {
                        apply_mask(
                            &mut input[start..start + len],
                            self.current.masking_key,
                            self.masking_position,
                        );
                        self.masking_position += len as u64;
                    }
                    pos += len;
                    self.payload_remaining -= len as u64;

                    trace!(
                        len = len,
                        remaining = self.payload_remaining,
                        "Decoded WebSocket payload chunk"
                    );

                    let frame_complete = self.payload_remaining == 0;
                    if frame_complete {
                        self.complete_frame();
                    }
                    return Ok((
                        pos,
                        Step::Payload {
                            start,
                            len,
                            frame_complete,
                        },
                    ));
                }
            }
        }
    }

    fn read_opcode_byte(&mut self, config: &DecoderConfig, byte: u8) -> DecodeResult<()> {
        let fin = byte & 0x80 != 0;
        let reserved = [byte & 0x40 != 0, byte & 0x20 != 0, byte & 0x10 != 0];
        let opcode = byte & 0x0F;

        if config.reject_reserved_bits && byte & 0x70 != 0 {
            return Err(DecodeError::ReservedBitsSet {
                bits: (byte & 0x70) >> 4,
            });
        }
        if config.reject_unknown_opcodes && !opcode::Opcode::from_u8(opcode).is_known() {
            return Err(DecodeError::UnknownOpcode { opcode });
        }

        if opcode::is_data(opcode) {
            if self.continuation_expected && opcode != opcode::CONTINUATION {
                return Err(DecodeError::ExpectedContinuation { opcode });
            }
            if !self.continuation_expected && opcode == opcode::CONTINUATION {
                return Err(DecodeError::UnexpectedContinuation);
            }
        } else if !fin {
            return Err(DecodeError::FragmentedControlFrame { opcode });
        }

        self.current.fin = fin;
        self.current.reserved = reserved;
        self.current.opcode = opcode;
        Ok(())
    }

    fn read_length_byte(&mut self, config: &DecoderConfig, byte: u8) -> DecodeResult<()> {
        let masked = byte & 0x80 != 0;
        match (config.masking, masked) {
            (MaskingPolicy::Required, false) => {
                return Err(DecodeError::Masking {
                    message: "frame must be masked",
                })
            }
            (MaskingPolicy::Forbidden, true) => {
                return Err(DecodeError::Masking {
                    message: "frame must not be masked",
                })
            }
            _ => {}
        }
        self.current.masked = masked;

        match byte & 0x7F {
            126 => {
                self.scratch.reset();
                self.stage = Stage::ExtendedLength { width: 2 };
            }
            127 => {
                self.scratch.reset();
                self.stage = Stage::ExtendedLength { width: 8 };
            }
            length => {
                self.set_payload_length(config, u64::from(length))?;
                self.stage = Stage::MaskingKeyCheck;
            }
        }
        Ok(())
    }

    fn set_payload_length(&mut self, config: &DecoderConfig, length: u64) -> DecodeResult<()> {
        if let Some(max) = config.max_control_payload {
            if self.current.is_control() && length > max {
                return Err(DecodeError::ControlPayloadTooLarge { length, max });
            }
        }
        self.current.payload_length = length;
        Ok(())
    }

    fn complete_frame(&mut self) {
        if self.current.is_data() {
            self.continuation_expected = !self.current.fin;
        }
        trace!(
            opcode = %self.current.kind(),
            continuation_expected = self.continuation_expected,
            "WebSocket frame complete"
        );
        self.stage = Stage::Done;
    }
}

/// Decoder lifecycle. A failed decoder never decodes again.
#[derive(Debug)]
enum Phase {
    Decoding(Machine),
    Failed,
}

/// Incremental WebSocket frame decoder.
///
/// One decoder serves one direction of one connection. Feed it bytes with
/// [`process`](Self::process) in whatever pieces they arrive; each call
/// reports at most one [`Event`]. After any error the decoder is failed for
/// good and every later call returns [`DecodeError::Failed`].
#[derive(Debug)]
pub struct Decoder {
    config: DecoderConfig,
    phase: Phase,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create a decoder with the default (framing-only) configuration
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Create a decoder with the given configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            phase: Phase::Decoding(Machine::new()),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode from the front of `data`, advancing it past the consumed bytes.
    ///
    /// Masked payload is unmasked in place, and the returned chunk borrows the
    /// caller's buffer. On error `data` is left untouched.
    pub fn process<'a>(&mut self, data: &mut &'a mut [u8]) -> DecodeResult<Event<&'a [u8]>> {
        let input = std::mem::take(data);
        let (consumed, step) = match self.step(input) {
            Ok(result) => result,
            Err(err) => {
                *data = input;
                return Err(err);
            }
        };

        let (head, tail) = input.split_at_mut(consumed);
        *data = tail;

        Ok(match step {
            Step::NeedMore => Event::NeedMore,
            Step::Header {
                header,
                frame_complete,
            } => Event::Header {
                header,
                frame_complete,
            },
            Step::Payload {
                start,
                len,
                frame_complete,
            } => Event::Payload {
                data: &head[start..start + len],
                frame_complete,
            },
        })
    }

    /// Decode from the front of `src`, splitting consumed bytes off it.
    ///
    /// Payload chunks are returned as [`Bytes`] sharing `src`'s allocation.
    pub fn process_buf(&mut self, src: &mut BytesMut) -> DecodeResult<Event<Bytes>> {
        let (consumed, step) = self.step(&mut src[..])?;
        let mut taken = src.split_to(consumed);

        Ok(match step {
            Step::NeedMore => Event::NeedMore,
            Step::Header {
                header,
                frame_complete,
            } => Event::Header {
                header,
                frame_complete,
            },
            Step::Payload {
                start,
                len,
                frame_complete,
            } => {
                let data = taken.split_off(start);
                debug_assert_eq!(data.len(), len);
                Event::Payload {
                    data: data.freeze(),
                    frame_complete,
                }
            }
        })
    }

    /// True once the decoder has reported an error
    pub fn is_failed(&self) -> bool {
        matches!(self.phase, Phase::Failed)
    }

    /// True while a fragmented data message is open
    pub fn continuation_expected(&self) -> bool {
        match &self.phase {
            Phase::Decoding(machine) => machine.continuation_expected,
            Phase::Failed => false,
        }
    }

    /// True between frames, with no partial header or payload pending
    pub fn is_idle(&self) -> bool {
        match &self.phase {
            Phase::Decoding(machine) => matches!(machine.stage, Stage::OpcodeByte | Stage::Done),
            Phase::Failed => false,
        }
    }

    /// Permanently fail the decoder, e.g. after a handler rejected an event
    pub(crate) fn fail(&mut self) {
        self.phase = Phase::Failed;
    }

    fn step(&mut self, input: &mut [u8]) -> DecodeResult<(usize, Step)> {
        let Phase::Decoding(machine) = &mut self.phase else {
            return Err(DecodeError::Failed);
        };

        match machine.step(&self.config, input) {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!(
                    error = %err,
                    kind = %err.kind(),
                    "WebSocket frame decoding failed"
                );
                self.phase = Phase::Failed;
                Err(err)
            }
        }
    }
}
