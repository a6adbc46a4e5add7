/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The received buffer is larger than one wire frame.
    #[error("buffer too large ({size} bytes, max {max})")]
    BufferTooLarge { size: usize, max: usize },

    /// The caller claimed more bytes than the buffer holds.
    #[error("buffer truncated (claimed {size} bytes, got {actual})")]
    Truncated { size: usize, actual: usize },

    /// A module-id data length exceeds the fixed 20-byte field.
    #[error("module data too long ({len} bytes, max {max})")]
    ModuleDataTooLong { len: usize, max: usize },

    /// A DATA byte count runs past the end of the frame.
    #[error("data count out of bounds ({count} bytes, max {max})")]
    DataCountOutOfBounds { count: usize, max: usize },

    /// A field or the data a length field selects lies past the bytes received.
    #[error("short frame (needs {needed} bytes, received {received})")]
    ShortFrame { needed: usize, received: usize },

    /// Strict mode: the header byte is not a known opcode.
    #[error("unknown opcode 0x{0:02x}")]
    UnknownOpcode(u8),

    /// Strict mode: the module id is not a known external module.
    #[error("unknown external module {0}")]
    UnknownModule(u8),

    /// The DATA size tag is the reserved value 3.
    #[error("reserved data size tag")]
    ReservedSizeTag,

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, CodecError>;
