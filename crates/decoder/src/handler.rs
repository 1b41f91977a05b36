//! Callback-style driver for [`Decoder`].
//!
//! [`CallbackDecoder`] forwards each decoded event to a [`FrameHandler`].
//! The handler owns whatever context it needs, so no separate user-data
//! pointer is threaded through. A handler error aborts decoding and fails
//! the decoder, even mid-frame.

use tracing::debug;

use crate::decoder::{Decoder, Event};
use crate::error::{BoxError, DecodeError, DecodeResult};
use crate::frame::FrameHeader;

/// Receiver of decoded frame events.
pub trait FrameHandler {
    /// Error returned to abort decoding
    type Error: Into<BoxError>;

    /// Called once per frame, when the non-payload portion has been decoded
    fn on_frame(&mut self, header: &FrameHeader) -> Result<(), Self::Error>;

    /// Called for each payload chunk. `data` is already unmasked and only
    /// valid for the duration of the call.
    fn on_payload(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// A [`Decoder`] that reports events through a [`FrameHandler`].
#[derive(Debug)]
pub struct CallbackDecoder<H> {
    decoder: Decoder,
    handler: H,
}

impl<H: FrameHandler> CallbackDecoder<H> {
    /// Wrap a default-configured decoder
    pub fn new(handler: H) -> Self {
        Self::with_decoder(Decoder::new(), handler)
    }

    /// Wrap an existing decoder
    pub fn with_decoder(decoder: Decoder, handler: H) -> Self {
        Self { decoder, handler }
    }

    /// Decode from the front of `data`, invoking at most one callback.
    ///
    /// Returns true when this call finished a frame.
    pub fn process(&mut self, data: &mut &mut [u8]) -> DecodeResult<bool> {
        let event = self.decoder.process(data)?;
        let frame_complete = event.is_frame_complete();

        let result = match event {
            Event::NeedMore => Ok(()),
            Event::Header { header, .. } => self.handler.on_frame(&header),
            Event::Payload { data, .. } => self.handler.on_payload(data),
        };

        if let Err(err) = result {
            let err: BoxError = err.into();
            debug!(error = %err, "Frame handler aborted decoding");
            self.decoder.fail();
            return Err(DecodeError::Callback(err));
        }

        Ok(frame_complete)
    }

    /// Decode all of `data`, returning how many frames were completed.
    ///
    /// This gives up the per-call backpressure of [`process`](Self::process);
    /// use it when the handler never needs to pause the stream.
    pub fn process_all(&mut self, mut data: &mut [u8]) -> DecodeResult<usize> {
        let mut frames = 0;
        while !data.is_empty() {
            if self.process(&mut data)? {
                frames += 1;
            }
        }
        Ok(frames)
    }

    /// Borrow the handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutably borrow the handler
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Borrow the underlying decoder
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Consume the adapter, returning the handler
    pub fn into_handler(self) -> H {
        self.handler
    }
}
