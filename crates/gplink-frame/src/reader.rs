use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{decode_wire_frame, CodecConfig, Decoded, WireFrame};
use crate::error::{CodecError, Result};
use crate::layout::FRAME_SIZE;

const INITIAL_BUFFER_CAPACITY: usize = 4 * FRAME_SIZE;
const READ_CHUNK_SIZE: usize = 4 * FRAME_SIZE;

/// Reads fixed-size frames from any `Read` stream (serial port, socket, file).
///
/// Handles partial reads internally: callers always get whole 64-byte frames.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: CodecConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with the default decode policy.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new frame reader with an explicit decode policy.
    pub fn with_config(inner: T, config: CodecConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(CodecError::ConnectionClosed)` when EOF is reached,
    /// including EOF in the middle of a frame.
    pub fn read_frame(&mut self) -> Result<WireFrame> {
        loop {
            if self.buf.len() >= FRAME_SIZE {
                let bytes = self.buf.split_to(FRAME_SIZE);
                trace!(header = bytes[0], "frame read");
                return WireFrame::from_slice(&bytes);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CodecError::Io(err)),
            };

            if read == 0 {
                return Err(CodecError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Read and decode the next frame with this reader's policy.
    pub fn next_decoded(&mut self) -> Result<Decoded> {
        let frame = self.read_frame()?;
        decode_wire_frame(&frame, &self.config)
    }

    /// Bytes buffered but not yet returned as a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current decode policy.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}
