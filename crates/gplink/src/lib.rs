//! Command codec for fixed-frame device-control links.
//!
//! gplink encodes host commands (stop, start clockwise/counter-clockwise,
//! auto switcher, module-id data) into 64-byte frames and decodes device
//! frames (channel samples, module-id replies) into typed events.
//!
//! # Crate Structure
//!
//! - [`frame`]: wire layout, encode/decode, event dispatch, stream adapters

/// Re-export frame types.
pub mod frame {
    pub use gplink_frame::*;
}

pub use gplink_frame::{
    decode, decode_frame, CodecConfig, CodecError, Command, Decoded, Event, EventSink, FrameSink,
    GeneralProtocol, WireFrame, FRAME_SIZE,
};
