//! Fixed-format command codec for a point-to-point device-control link.
//!
//! Every command travels in one 64-byte frame:
//! - A 1-byte opcode selecting the payload layout
//! - A 63-byte little-endian, packed payload, zero-filled past its fields
//!
//! Host-to-device commands are built with the `encode_*` functions or
//! [`Command::encode`]. Device-to-host frames go through [`decode`], which
//! yields at most one typed [`Event`]; [`GeneralProtocol`] wires both
//! directions to an [`EventSink`] and a [`FrameSink`].

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod command;
pub mod error;
pub mod event;
pub mod layout;
pub mod opcode;
pub mod protocol;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::GpCodec;
pub use codec::{
    decode, decode_frame, decode_wire_frame, decode_with_config, CodecConfig, Decoded, Ignored,
    WireFrame,
};
pub use command::{
    encode_data, encode_get_module_data, encode_set_module_data, encode_start_auto_switcher,
    encode_start_clockwise, encode_start_counter_clockwise, encode_stop, parse_command, Command,
};
pub use error::{CodecError, Result};
pub use event::{dispatch, Event, EventKind, EventSink};
pub use layout::{FRAME_SIZE, HEADER_SIZE, MAX_DATA_LEN, MAX_MODULE_DATA_LEN, PAYLOAD_SIZE};
pub use opcode::{
    is_single_channel, opcode_name, ExternalModule, Opcode, SizeTag, CHANNEL_ALL, MAX_CHANNEL,
};
pub use protocol::{FrameSink, GeneralProtocol, Received};
pub use reader::FrameReader;
pub use writer::FrameWriter;
