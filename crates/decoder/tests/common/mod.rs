//! Shared helpers for decoder integration tests: a reference frame encoder
//! and an event recorder that normalizes payload chunking.

#![allow(dead_code)]

use bytes::{BufMut, BytesMut};
use wsframe_decoder::{apply_mask, DecodeError, Decoder, Event, FrameHeader};

/// A frame to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFrame {
    pub fin: bool,
    pub reserved: [bool; 3],
    pub opcode: u8,
    pub mask: Option<[u8; 4]>,
    pub payload: Vec<u8>,
}

impl TestFrame {
    pub fn new(opcode: u8, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            fin: true,
            reserved: [false; 3],
            opcode,
            mask: None,
            payload: payload.into(),
        }
    }

    pub fn with_fin(mut self, fin: bool) -> Self {
        self.fin = fin;
        self
    }

    pub fn with_mask(mut self, mask: [u8; 4]) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_random_mask(self) -> Self {
        self.with_mask(rand::random())
    }

    pub fn with_reserved(mut self, reserved: [bool; 3]) -> Self {
        self.reserved = reserved;
        self
    }

    /// Header the decoder is expected to report for this frame
    pub fn expected_header(&self) -> FrameHeader {
        FrameHeader {
            fin: self.fin,
            reserved: self.reserved,
            masked: self.mask.is_some(),
            opcode: self.opcode,
            payload_length: self.payload.len() as u64,
            masking_key: self.mask.unwrap_or_default(),
        }
    }
}

/// Encode a frame using the shortest length form.
pub fn encode(frame: &TestFrame, dst: &mut BytesMut) {
    let payload_len = frame.payload.len();

    let mut first_byte = frame.opcode & 0x0F;
    if frame.fin {
        first_byte |= 0x80;
    }
    for (i, bit) in frame.reserved.iter().enumerate() {
        if *bit {
            first_byte |= 0x40 >> i;
        }
    }
    dst.put_u8(first_byte);

    let mask_bit = if frame.mask.is_some() { 0x80 } else { 0x00 };
    match payload_len {
        0..=125 => dst.put_u8(mask_bit | payload_len as u8),
        126..=65535 => {
            dst.put_u8(mask_bit | 126);
            dst.put_u16(payload_len as u16);
        }
        _ => {
            dst.put_u8(mask_bit | 127);
            dst.put_u64(payload_len as u64);
        }
    }

    match frame.mask {
        Some(key) => {
            dst.put_slice(&key);
            let mut masked = frame.payload.clone();
            apply_mask(&mut masked, key, 0);
            dst.put_slice(&masked);
        }
        None => dst.put_slice(&frame.payload),
    }
}

/// Encode a sequence of frames into one buffer.
pub fn encode_all(frames: &[TestFrame]) -> Vec<u8> {
    let mut dst = BytesMut::new();
    for frame in frames {
        encode(frame, &mut dst);
    }
    dst.to_vec()
}

/// Normalized decoder output. Adjacent payload chunks are merged so that
/// different input splits can be compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Header(FrameHeader),
    Payload(Vec<u8>),
    Complete,
}

fn record_payload(events: &mut Vec<Recorded>, data: &[u8]) {
    if let Some(Recorded::Payload(existing)) = events.last_mut() {
        existing.extend_from_slice(data);
    } else {
        events.push(Recorded::Payload(data.to_vec()));
    }
}

/// Feed `bytes` to `decoder` in chunks cycling through `sizes`, calling
/// `process` until each chunk is exhausted.
pub fn decode_chunked(
    decoder: &mut Decoder,
    bytes: &[u8],
    sizes: &[usize],
) -> Result<Vec<Recorded>, DecodeError> {
    let mut buf = bytes.to_vec();
    let mut events = Vec::new();
    let mut remaining: &mut [u8] = &mut buf;
    let mut size_index = 0;

    while !remaining.is_empty() {
        let size = sizes
            .get(size_index % sizes.len().max(1))
            .copied()
            .unwrap_or(usize::MAX)
            .clamp(1, remaining.len());
        size_index += 1;

        let (chunk, rest) = std::mem::take(&mut remaining).split_at_mut(size);
        remaining = rest;

        let mut cursor = chunk;
        loop {
            match decoder.process(&mut cursor)? {
                Event::NeedMore => {
                    assert!(cursor.is_empty(), "NeedMore with unread input");
                    break;
                }
                Event::Header {
                    header,
                    frame_complete,
                } => {
                    events.push(Recorded::Header(header));
                    if frame_complete {
                        events.push(Recorded::Complete);
                    }
                }
                Event::Payload {
                    data,
                    frame_complete,
                } => {
                    assert!(!data.is_empty(), "empty payload chunk");
                    record_payload(&mut events, data);
                    if frame_complete {
                        events.push(Recorded::Complete);
                    }
                }
            }
        }
    }

    Ok(events)
}

/// Feed all of `bytes` as a single chunk.
pub fn decode_whole(decoder: &mut Decoder, bytes: &[u8]) -> Result<Vec<Recorded>, DecodeError> {
    decode_chunked(decoder, bytes, &[usize::MAX])
}

/// Events a correct decoder reports for `frames`.
pub fn expected_events(frames: &[TestFrame]) -> Vec<Recorded> {
    let mut events = Vec::new();
    for frame in frames {
        events.push(Recorded::Header(frame.expected_header()));
        if !frame.payload.is_empty() {
            events.push(Recorded::Payload(frame.payload.clone()));
        }
        events.push(Recorded::Complete);
    }
    events
}
