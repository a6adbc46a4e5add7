use std::io::{self, ErrorKind, Write};

use tracing::trace;

use crate::codec::WireFrame;
use crate::command::Command;
use crate::error::{CodecError, Result};
use crate::protocol::FrameSink;

/// Writes whole frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
}

impl<T: Write> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Write one complete frame (blocking) and flush.
    pub fn write_frame(&mut self, frame: &WireFrame) -> Result<()> {
        let bytes = frame.as_bytes();
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => return Err(CodecError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(CodecError::Io(err)),
            }
        }
        trace!(header = frame.header(), "frame written");

        self.flush()
    }

    /// Encode and write a command.
    pub fn send(&mut self, command: &Command) -> Result<()> {
        let frame = command.encode()?;
        self.write_frame(&frame)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(CodecError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Write> FrameSink for FrameWriter<T> {
    fn send_frame(&mut self, frame: &WireFrame) -> io::Result<()> {
        self.write_frame(frame).map_err(|err| match err {
            CodecError::Io(io) => io,
            CodecError::ConnectionClosed => io::Error::from(ErrorKind::WriteZero),
            other => io::Error::other(other.to_string()),
        })
    }
}
