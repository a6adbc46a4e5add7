//! `tokio_util::codec` adapter for async transports.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_wire_frame, CodecConfig, Decoded, WireFrame};
use crate::command::Command;
use crate::error::{CodecError, Result};
use crate::layout::FRAME_SIZE;

/// Splits a byte stream into 64-byte frames and decodes each one.
///
/// Each item is the outcome of decoding one frame. A malformed frame yields
/// `Some(Err(..))` as an item and the stream carries on with the next frame;
/// only I/O failures end the stream.
#[derive(Debug, Clone, Default)]
pub struct GpCodec {
    config: CodecConfig,
}

impl GpCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }
}

impl Decoder for GpCodec {
    type Item = Result<Decoded>;
    type Error = CodecError;

    fn decode(
        &mut self,
        src: &mut BytesMut,
    ) -> std::result::Result<Option<Self::Item>, Self::Error> {
        if src.len() < FRAME_SIZE {
            src.reserve(FRAME_SIZE - src.len());
            return Ok(None);
        }
        let bytes = src.split_to(FRAME_SIZE);
        let frame = WireFrame::from_slice(&bytes)?;
        Ok(Some(decode_wire_frame(&frame, &self.config)))
    }
}

impl Encoder<WireFrame> for GpCodec {
    type Error = CodecError;

    fn encode(&mut self, item: WireFrame, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(FRAME_SIZE);
        dst.put_slice(item.as_bytes());
        Ok(())
    }
}

impl Encoder<Command> for GpCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Command, dst: &mut BytesMut) -> Result<()> {
        let frame = item.encode()?;
        Encoder::<WireFrame>::encode(self, frame, dst)
    }
}
