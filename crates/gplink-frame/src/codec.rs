use std::fmt;

use tracing::{debug, trace};

use crate::command::parse_command;
use crate::error::{CodecError, Result};
use crate::event::Event;
use crate::layout::{FRAME_SIZE, HEADER_SIZE, OPCODE_OFFSET};
use crate::opcode::{opcode_name, Opcode};

/// One fixed-size wire frame.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────────────────────────────────────────┐
/// │ Opcode   │ Payload (63 bytes, layout selected by opcode) │
/// │ (1B)     │ little-endian, packed, zero-filled            │
/// └──────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WireFrame {
    bytes: [u8; FRAME_SIZE],
    /// Bytes actually received; the rest of `bytes` is zero fill.
    len: usize,
}

impl WireFrame {
    /// An all-zero frame.
    pub fn zeroed() -> Self {
        Self {
            bytes: [0u8; FRAME_SIZE],
            len: FRAME_SIZE,
        }
    }

    /// A zeroed frame carrying `opcode` in its header.
    pub fn new(opcode: Opcode) -> Self {
        let mut frame = Self::zeroed();
        frame.bytes[OPCODE_OFFSET] = opcode.as_u8();
        frame
    }

    /// Copy a received buffer into a frame, zero-filling the tail.
    ///
    /// Buffers longer than [`FRAME_SIZE`] are rejected before anything is copied.
    /// The frame remembers how many bytes were received so that length fields
    /// can be checked against them.
    pub fn from_slice(buf: &[u8]) -> Result<Self> {
        if buf.len() > FRAME_SIZE {
            return Err(CodecError::BufferTooLarge {
                size: buf.len(),
                max: FRAME_SIZE,
            });
        }
        let mut bytes = [0u8; FRAME_SIZE];
        bytes[..buf.len()].copy_from_slice(buf);
        Ok(Self {
            bytes,
            len: buf.len(),
        })
    }

    /// The raw header byte.
    pub fn header(&self) -> u8 {
        self.bytes[OPCODE_OFFSET]
    }

    /// The header as an opcode, if it is one.
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_u8(self.header())
    }

    /// Number of bytes received. Encoded frames are always full.
    pub fn received_len(&self) -> usize {
        self.len
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.bytes
    }

    pub fn into_bytes(self) -> [u8; FRAME_SIZE] {
        self.bytes
    }

    /// The 63 bytes after the header.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..]
    }

    pub(crate) fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[HEADER_SIZE..]
    }

    /// Lowercase hex of all 64 bytes, no separators.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl Default for WireFrame {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl AsRef<[u8]> for WireFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<[u8; FRAME_SIZE]> for WireFrame {
    fn from(bytes: [u8; FRAME_SIZE]) -> Self {
        Self {
            bytes,
            len: FRAME_SIZE,
        }
    }
}

impl fmt::Debug for WireFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireFrame")
            .field("opcode", &opcode_name(self.header()))
            .field("received", &self.len)
            .field("bytes", &self.to_hex())
            .finish()
    }
}

/// Decode policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecConfig {
    /// Reject unknown opcodes, unknown module ids and the reserved size tag
    /// instead of ignoring them. Default: false.
    pub strict: bool,
}

impl CodecConfig {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Why a structurally valid frame produced no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// Zero bytes were handed to decode.
    Empty,
    /// The header byte is not an assigned opcode.
    UnknownOpcode(u8),
    /// The opcode is valid but only ever travels host-to-device.
    NoEventPath(Opcode),
    /// A module-id reply named an unknown external module.
    UnknownModule(u8),
    /// A DATA frame used the reserved size tag.
    ReservedSizeTag,
}

impl Ignored {
    /// The error this becomes under [`CodecConfig::strict`], if any.
    fn strict_error(self) -> Option<CodecError> {
        match self {
            Self::UnknownOpcode(value) => Some(CodecError::UnknownOpcode(value)),
            Self::UnknownModule(value) => Some(CodecError::UnknownModule(value)),
            Self::ReservedSizeTag => Some(CodecError::ReservedSizeTag),
            Self::Empty | Self::NoEventPath(_) => None,
        }
    }
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty buffer"),
            Self::UnknownOpcode(value) => write!(f, "unknown opcode 0x{value:02x}"),
            Self::NoEventPath(op) => write!(f, "{} has no receive event", op.name()),
            Self::UnknownModule(value) => write!(f, "unknown external module {value}"),
            Self::ReservedSizeTag => write!(f, "reserved data size tag"),
        }
    }
}

/// Result of decoding one frame: exactly one event, or a reason for none.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Event(Event),
    Ignored(Ignored),
}

impl Decoded {
    pub fn event(&self) -> Option<&Event> {
        match self {
            Self::Event(event) => Some(event),
            Self::Ignored(_) => None,
        }
    }

    pub fn into_event(self) -> Option<Event> {
        match self {
            Self::Event(event) => Some(event),
            Self::Ignored(_) => None,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// Decode the first `size` bytes of `buffer` with the default (permissive) policy.
pub fn decode(buffer: &[u8], size: usize) -> Result<Decoded> {
    decode_with_config(buffer, size, &CodecConfig::default())
}

/// Decode a whole received buffer.
pub fn decode_frame(buffer: &[u8]) -> Result<Decoded> {
    decode(buffer, buffer.len())
}

/// Decode the first `size` bytes of `buffer`.
///
/// `size` is checked against [`FRAME_SIZE`] and against `buffer` before any
/// byte is copied. Short buffers are zero-filled to a full frame, but length
/// fields are checked against `size`: data past the received bytes is an
/// error, never zero fill.
pub fn decode_with_config(buffer: &[u8], size: usize, config: &CodecConfig) -> Result<Decoded> {
    if size > FRAME_SIZE {
        debug!(size, max = FRAME_SIZE, "rejecting oversized buffer");
        return Err(CodecError::BufferTooLarge {
            size,
            max: FRAME_SIZE,
        });
    }
    if size > buffer.len() {
        return Err(CodecError::Truncated {
            size,
            actual: buffer.len(),
        });
    }
    if size == 0 {
        return Ok(Decoded::Ignored(Ignored::Empty));
    }

    let frame = WireFrame::from_slice(&buffer[..size])?;
    decode_wire_frame(&frame, config)
}

/// Decode a complete frame.
pub fn decode_wire_frame(frame: &WireFrame, config: &CodecConfig) -> Result<Decoded> {
    let header = frame.header();
    let decoded = match frame.opcode() {
        // Only DATA and module-id replies travel device-to-host.
        Some(Opcode::Data) | Some(Opcode::GetModuleIdData) => {
            let command = parse_command(frame)?;
            match Event::from_command(command) {
                Ok(event) => Decoded::Event(event),
                Err(ignored) => Decoded::Ignored(ignored),
            }
        }
        Some(op) => Decoded::Ignored(Ignored::NoEventPath(op)),
        None => Decoded::Ignored(Ignored::UnknownOpcode(header)),
    };

    match &decoded {
        Decoded::Event(event) => {
            trace!(
                opcode = opcode_name(header),
                kind = event.kind().as_str(),
                len = event.len(),
                "frame decoded"
            );
        }
        Decoded::Ignored(ignored) => {
            debug!(opcode = opcode_name(header), reason = %ignored, "frame ignored");
            if config.strict {
                if let Some(err) = ignored.strict_error() {
                    return Err(err);
                }
            }
        }
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{
        DATA_COUNT_RANGE, DATA_FLAGS_OFFSET, DATA_OFFSET, MAX_DATA_LEN, MODULE_DATA_OFFSET,
        MODULE_ID_OFFSET, MODULE_LEN_OFFSET,
    };

    fn data_frame(channel: u8, flags: u8, count: u16, data: &[u8]) -> [u8; FRAME_SIZE] {
        let mut buf = [0u8; FRAME_SIZE];
        buf[OPCODE_OFFSET] = Opcode::Data.as_u8();
        buf[1] = channel;
        buf[DATA_FLAGS_OFFSET] = flags;
        buf[DATA_COUNT_RANGE].copy_from_slice(&count.to_le_bytes());
        buf[DATA_OFFSET..DATA_OFFSET + data.len()].copy_from_slice(data);
        buf
    }

    fn module_reply(module: u8, len: u8, data: &[u8]) -> [u8; FRAME_SIZE] {
        let mut buf = [0u8; FRAME_SIZE];
        buf[OPCODE_OFFSET] = Opcode::GetModuleIdData.as_u8();
        buf[MODULE_ID_OFFSET] = module;
        buf[MODULE_LEN_OFFSET] = len;
        buf[MODULE_DATA_OFFSET..MODULE_DATA_OFFSET + data.len()].copy_from_slice(data);
        buf
    }

    #[test]
    fn test_decode_data_8bit() {
        let buf = data_frame(2, 0, 5, &[9, 8, 7, 6, 5]);
        let decoded = decode_frame(&buf).unwrap();
        assert_eq!(
            decoded,
            Decoded::Event(Event::Data8 {
                channel: 2,
                values: vec![9, 8, 7, 6, 5],
            })
        );
    }

    #[test]
    fn test_decode_data_16bit_uses_element_count() {
        let buf = data_frame(1, 1, 6, &[0x34, 0x12, 0xff, 0xff, 0x01, 0x00]);
        let decoded = decode_frame(&buf).unwrap();
        assert_eq!(
            decoded,
            Decoded::Event(Event::Data16 {
                channel: 1,
                values: vec![0x1234, 0xffff, 0x0001],
            })
        );
    }

    #[test]
    fn test_decode_data_32bit_widens_exactly() {
        let mut data = Vec::new();
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        data.extend_from_slice(&16_777_217u32.to_le_bytes());
        let buf = data_frame(0, 2, 8, &data);

        let event = decode_frame(&buf).unwrap().into_event().unwrap();
        assert_eq!(
            event,
            Event::Numeric {
                channel: 0,
                values: vec![4_294_967_295.0, 16_777_217.0],
            }
        );
    }

    #[test]
    fn test_decode_data_drops_partial_element() {
        let buf = data_frame(0, 2, 6, &[1, 0, 0, 0, 0xAA, 0xBB]);
        let event = decode_frame(&buf).unwrap().into_event().unwrap();
        assert_eq!(event.len(), 1);
    }

    #[test]
    fn test_decode_data_reserved_tag_ignored() {
        let buf = data_frame(0, 3, 4, &[1, 2, 3, 4]);
        let decoded = decode_frame(&buf).unwrap();
        assert_eq!(decoded, Decoded::Ignored(Ignored::ReservedSizeTag));
    }

    #[test]
    fn test_decode_data_count_out_of_bounds() {
        let buf = data_frame(0, 0, (MAX_DATA_LEN + 1) as u16, &[]);
        let result = decode_frame(&buf);
        assert!(matches!(
            result,
            Err(CodecError::DataCountOutOfBounds { count, max }) if count == MAX_DATA_LEN + 1 && max == MAX_DATA_LEN
        ));
    }

    #[test]
    fn test_decode_data_full_frame() {
        let data: Vec<u8> = (0..MAX_DATA_LEN as u8).collect();
        let buf = data_frame(7, 0, MAX_DATA_LEN as u16, &data);
        let event = decode_frame(&buf).unwrap().into_event().unwrap();
        assert_eq!(event.len(), MAX_DATA_LEN);
    }

    #[test]
    fn test_decode_module_reply_cold_palette() {
        let buf = module_reply(0, 2, &[0x10, 0x20]);
        let decoded = decode_frame(&buf).unwrap();
        assert_eq!(
            decoded,
            Decoded::Event(Event::ColdPaletteModuleData(vec![0x10, 0x20]))
        );
    }

    #[test]
    fn test_decode_module_reply_rgb_cap() {
        let buf = module_reply(1, 3, &[1, 2, 3, 4]);
        let decoded = decode_frame(&buf).unwrap();
        assert_eq!(decoded, Decoded::Event(Event::RgbCapModuleData(vec![1, 2, 3])));
    }

    #[test]
    fn test_decode_module_reply_too_long() {
        let buf = module_reply(0, 21, &[]);
        let result = decode_frame(&buf);
        assert!(matches!(
            result,
            Err(CodecError::ModuleDataTooLong { len: 21, max: 20 })
        ));
    }

    #[test]
    fn test_decode_module_reply_unknown_module() {
        let buf = module_reply(9, 1, &[0x55]);
        let decoded = decode_frame(&buf).unwrap();
        assert_eq!(decoded, Decoded::Ignored(Ignored::UnknownModule(9)));
    }

    #[test]
    fn test_decode_unknown_opcode() {
        let mut buf = [0u8; FRAME_SIZE];
        buf[0] = 5;
        let decoded = decode_frame(&buf).unwrap();
        assert_eq!(decoded, Decoded::Ignored(Ignored::UnknownOpcode(5)));
    }

    #[test]
    fn test_decode_host_only_opcode() {
        let mut buf = [0u8; FRAME_SIZE];
        buf[0] = Opcode::Stop.as_u8();
        buf[1] = 3;
        let decoded = decode_frame(&buf).unwrap();
        assert_eq!(decoded, Decoded::Ignored(Ignored::NoEventPath(Opcode::Stop)));
    }

    #[test]
    fn test_decode_set_module_frame_skips_length_check() {
        let mut buf = [0u8; FRAME_SIZE];
        buf[0] = Opcode::SetModuleIdData.as_u8();
        buf[MODULE_LEN_OFFSET] = 200;
        let decoded = decode_frame(&buf).unwrap();
        assert!(decoded.is_ignored());
    }

    #[test]
    fn test_decode_buffer_too_large() {
        let buf = [0u8; FRAME_SIZE + 1];
        let result = decode_frame(&buf);
        assert!(matches!(
            result,
            Err(CodecError::BufferTooLarge { size: 65, max: 64 })
        ));
    }

    #[test]
    fn test_decode_size_larger_than_buffer() {
        let buf = [0u8; 4];
        let result = decode(&buf, 10);
        assert!(matches!(
            result,
            Err(CodecError::Truncated { size: 10, actual: 4 })
        ));
    }

    #[test]
    fn test_decode_data_header_must_be_received() {
        // opcode, channel, flags and only half of the count field
        let result = decode_frame(&[0u8, 4, 0, 2]);
        assert!(matches!(
            result,
            Err(CodecError::ShortFrame {
                needed: 5,
                received: 4
            })
        ));
    }

    #[test]
    fn test_decode_data_count_past_size_rejected() {
        let result = decode(&[0, 0, 0, 4, 0, 0xAA], 6);
        assert!(matches!(
            result,
            Err(CodecError::ShortFrame {
                needed: 9,
                received: 6
            })
        ));
    }

    #[test]
    fn test_decode_respects_size_argument() {
        // The full buffer holds both data bytes, but only the first is inside `size`.
        let buf = data_frame(0, 0, 2, &[0xAA, 0xBB]);
        let result = decode(&buf, 6);
        assert!(matches!(
            result,
            Err(CodecError::ShortFrame {
                needed: 7,
                received: 6
            })
        ));

        let event = decode(&buf, 7).unwrap().into_event().unwrap();
        assert_eq!(
            event,
            Event::Data8 {
                channel: 0,
                values: vec![0xAA, 0xBB],
            }
        );
    }

    #[test]
    fn test_decode_data_16bit_count_past_size_rejected() {
        let buf = data_frame(1, 1, 4, &[0x01, 0x00, 0x02, 0x00]);
        let result = decode(&buf, DATA_OFFSET + 3);
        assert!(matches!(
            result,
            Err(CodecError::ShortFrame {
                needed: 9,
                received: 8
            })
        ));
    }

    #[test]
    fn test_decode_data_32bit_count_past_size_rejected() {
        let buf = data_frame(2, 2, 8, &[1, 0, 0, 0, 2, 0, 0, 0]);
        let result = decode(&buf, DATA_OFFSET + 4);
        assert!(matches!(
            result,
            Err(CodecError::ShortFrame {
                needed: 13,
                received: 9
            })
        ));
    }

    #[test]
    fn test_decode_module_reply_len_past_size_rejected() {
        let result = decode(&[Opcode::GetModuleIdData.as_u8(), 0, 5], 3);
        assert!(matches!(
            result,
            Err(CodecError::ShortFrame {
                needed: 8,
                received: 3
            })
        ));

        let buf = module_reply(1, 4, &[1, 2, 3, 4]);
        assert!(decode(&buf, MODULE_DATA_OFFSET + 3).is_err());
        assert_eq!(
            decode(&buf, MODULE_DATA_OFFSET + 4).unwrap(),
            Decoded::Event(Event::RgbCapModuleData(vec![1, 2, 3, 4]))
        );
    }

    #[test]
    fn test_decode_short_frame_without_length_fields() {
        // Host-only opcodes carry no receive event, so their short frames are ignored.
        assert_eq!(
            decode_frame(&[Opcode::Stop.as_u8()]).unwrap(),
            Decoded::Ignored(Ignored::NoEventPath(Opcode::Stop))
        );
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode(&[], 0).unwrap(), Decoded::Ignored(Ignored::Empty));
    }

    #[test]
    fn test_strict_mode_rejects_unknowns() {
        let strict = CodecConfig::strict();

        let mut unknown = [0u8; FRAME_SIZE];
        unknown[0] = 0x42;
        assert!(matches!(
            decode_with_config(&unknown, FRAME_SIZE, &strict),
            Err(CodecError::UnknownOpcode(0x42))
        ));

        let module = module_reply(3, 0, &[]);
        assert!(matches!(
            decode_with_config(&module, FRAME_SIZE, &strict),
            Err(CodecError::UnknownModule(3))
        ));

        let reserved = data_frame(0, 3, 0, &[]);
        assert!(matches!(
            decode_with_config(&reserved, FRAME_SIZE, &strict),
            Err(CodecError::ReservedSizeTag)
        ));

        let mut stop = [0u8; FRAME_SIZE];
        stop[0] = Opcode::Stop.as_u8();
        assert!(decode_with_config(&stop, FRAME_SIZE, &strict)
            .unwrap()
            .is_ignored());
    }

    #[test]
    fn test_wire_frame_from_slice() {
        let frame = WireFrame::from_slice(&[7, 1, 2]).unwrap();
        assert_eq!(frame.opcode(), Some(Opcode::GetModuleIdData));
        assert_eq!(&frame.as_bytes()[..4], &[7, 1, 2, 0]);
        assert_eq!(frame.received_len(), 3);
        assert!(WireFrame::from_slice(&[0u8; 65]).is_err());
    }

    #[test]
    fn test_wire_frame_hex() {
        let frame = WireFrame::new(Opcode::Stop);
        let hex = frame.to_hex();
        assert_eq!(hex.len(), FRAME_SIZE * 2);
        assert!(hex.starts_with("0100"));
    }
}
