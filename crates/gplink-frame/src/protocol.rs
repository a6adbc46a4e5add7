use std::io;

use tracing::debug;

use crate::codec::{decode_with_config, CodecConfig, Decoded, WireFrame};
use crate::command::{
    encode_get_module_data, encode_set_module_data, encode_start_auto_switcher,
    encode_start_clockwise, encode_start_counter_clockwise, encode_stop, Command,
};
use crate::error::Result;
use crate::event::{dispatch, EventKind, EventSink};

/// Outbound send channel for encoded frames.
pub trait FrameSink {
    fn send_frame(&mut self, frame: &WireFrame) -> io::Result<()>;
}

/// Collects frames in memory.
impl FrameSink for Vec<WireFrame> {
    fn send_frame(&mut self, frame: &WireFrame) -> io::Result<()> {
        self.push(*frame);
        Ok(())
    }
}

/// Binds the codec to an event sink (receive side) and a frame sink
/// (transmit side).
///
/// Holds no state between calls beyond the two sinks and the decode policy.
pub struct GeneralProtocol<S, T> {
    events: S,
    frames: T,
    config: CodecConfig,
}

impl<S: EventSink, T: FrameSink> GeneralProtocol<S, T> {
    /// Create a protocol endpoint with the default (permissive) policy.
    pub fn new(events: S, frames: T) -> Self {
        Self::with_config(events, frames, CodecConfig::default())
    }

    pub fn with_config(events: S, frames: T, config: CodecConfig) -> Self {
        Self {
            events,
            frames,
            config,
        }
    }

    /// Decode the first `size` bytes of a received buffer and hand any event
    /// to the event sink.
    ///
    /// Returns what was decoded; the event itself has already moved into the
    /// sink, so only ignored outcomes carry detail.
    pub fn receive(&mut self, buffer: &[u8], size: usize) -> Result<Received> {
        match decode_with_config(buffer, size, &self.config)? {
            Decoded::Event(event) => {
                let kind = event.kind();
                dispatch(event, &mut self.events);
                Ok(Received::Dispatched(kind))
            }
            Decoded::Ignored(ignored) => Ok(Received::Ignored(ignored)),
        }
    }

    pub fn send_stop(&mut self, channel: u8) -> Result<()> {
        self.transmit(&encode_stop(channel))
    }

    pub fn send_start_clockwise(&mut self, channel: u8) -> Result<()> {
        self.transmit(&encode_start_clockwise(channel))
    }

    pub fn send_start_counter_clockwise(&mut self, channel: u8) -> Result<()> {
        self.transmit(&encode_start_counter_clockwise(channel))
    }

    pub fn send_start_auto_switcher(
        &mut self,
        channel: u8,
        off_time: u16,
        on_time: u16,
        count: u32,
    ) -> Result<()> {
        self.transmit(&encode_start_auto_switcher(
            channel, off_time, on_time, count,
        ))
    }

    pub fn send_set_module_data(&mut self, module: u8, data: &[u8]) -> Result<()> {
        let frame = encode_set_module_data(module, data)?;
        self.transmit(&frame)
    }

    pub fn send_get_module_data(&mut self, module: u8, len: u8) -> Result<()> {
        let frame = encode_get_module_data(module, len)?;
        self.transmit(&frame)
    }

    /// Encode and send any command.
    pub fn send(&mut self, command: &Command) -> Result<()> {
        let frame = command.encode()?;
        self.transmit(&frame)
    }

    fn transmit(&mut self, frame: &WireFrame) -> Result<()> {
        debug!(opcode = ?frame.opcode(), "sending frame");
        self.frames.send_frame(frame)?;
        Ok(())
    }

    pub fn events(&self) -> &S {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut S {
        &mut self.events
    }

    pub fn frames(&self) -> &T {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut T {
        &mut self.frames
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Consume the endpoint and return both sinks.
    pub fn into_parts(self) -> (S, T) {
        (self.events, self.frames)
    }
}

/// Outcome of [`GeneralProtocol::receive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    /// An event of this kind went to the event sink.
    Dispatched(EventKind),
    /// Nothing was dispatched.
    Ignored(crate::codec::Ignored),
}
