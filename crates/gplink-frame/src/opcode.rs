//! Opcodes, size tags and external module ids.
//!
//! Opcode 5 is unassigned on the wire and is treated like any other unknown
//! header byte.

/// Highest single-output channel number.
pub const MAX_CHANNEL: u8 = 7;

/// Channel value addressing every output at once.
pub const CHANNEL_ALL: u8 = 0xFF;

/// Mask selecting the size tag from the DATA flags byte.
pub const SIZE_TAG_MASK: u8 = 0b11;

/// Header byte at frame offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Channel sample data (receive side).
    Data = 0,
    /// Stop a channel.
    Stop = 1,
    /// Start a channel turning clockwise.
    StartClockwise = 2,
    /// Start a channel turning counter-clockwise.
    StartCounterClockwise = 3,
    /// Start the periodic on/off switcher on a channel.
    StartAutoSwitcher = 4,
    /// Write module-id data to an external module.
    SetModuleIdData = 6,
    /// Request (or carry the reply of) module-id data.
    GetModuleIdData = 7,
}

impl Opcode {
    /// Parse a header byte. Returns `None` for unassigned values.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Data),
            1 => Some(Self::Stop),
            2 => Some(Self::StartClockwise),
            3 => Some(Self::StartCounterClockwise),
            4 => Some(Self::StartAutoSwitcher),
            6 => Some(Self::SetModuleIdData),
            7 => Some(Self::GetModuleIdData),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns a human-readable name for the opcode.
    pub fn name(self) -> &'static str {
        match self {
            Self::Data => "DATA",
            Self::Stop => "STOP",
            Self::StartClockwise => "START_CLOCKWISE",
            Self::StartCounterClockwise => "START_COUNTER_CLOCKWISE",
            Self::StartAutoSwitcher => "START_AUTO_SWITCHER",
            Self::SetModuleIdData => "SET_MODULE_ID_DATA",
            Self::GetModuleIdData => "GET_MODULE_ID_DATA",
        }
    }
}

/// Returns a human-readable name for a raw header byte.
pub fn opcode_name(value: u8) -> &'static str {
    Opcode::from_u8(value).map_or("UNKNOWN", Opcode::name)
}

/// Element width of a DATA payload, from the low two bits of `flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTag {
    Bits8 = 0,
    Bits16 = 1,
    Bits32 = 2,
}

impl SizeTag {
    /// Extract the tag from a flags byte. Returns `None` for the reserved tag 3.
    pub fn from_flags(flags: u8) -> Option<Self> {
        match flags & SIZE_TAG_MASK {
            0 => Some(Self::Bits8),
            1 => Some(Self::Bits16),
            2 => Some(Self::Bits32),
            _ => None,
        }
    }

    /// Element size in bytes.
    pub fn element_size(self) -> usize {
        match self {
            Self::Bits8 => 1,
            Self::Bits16 => 2,
            Self::Bits32 => 4,
        }
    }

    pub fn as_flags(self) -> u8 {
        self as u8
    }
}

/// External hardware modules addressed by the module-id commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalModule {
    ColdPalette = 0,
    RgbCap = 1,
}

impl ExternalModule {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::ColdPalette),
            1 => Some(Self::RgbCap),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ColdPalette => "COLD_PALETTE",
            Self::RgbCap => "RGB_CAP",
        }
    }
}

/// Returns true if the channel addresses a single output.
pub fn is_single_channel(channel: u8) -> bool {
    channel <= MAX_CHANNEL
}
