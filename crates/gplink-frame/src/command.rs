//! Typed commands and their fixed-offset encoding.

use bytes::{Buf, BufMut};

use crate::codec::WireFrame;
use crate::error::{CodecError, Result};
use crate::layout::{
    AUTO_COUNT_RANGE, CHANNEL_OFFSET, DATA_OFFSET, MAX_DATA_LEN, MAX_MODULE_DATA_LEN,
    MODULE_DATA_OFFSET,
};
use crate::opcode::{Opcode, SizeTag};

/// One command, with only the fields its opcode defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Channel sample data. `data` holds exactly `count` bytes.
    Data { channel: u8, flags: u8, data: Vec<u8> },
    Stop { channel: u8 },
    StartClockwise { channel: u8 },
    StartCounterClockwise { channel: u8 },
    StartAutoSwitcher {
        channel: u8,
        off_time: u16,
        on_time: u16,
        count: u32,
    },
    SetModuleIdData { module: u8, data: Vec<u8> },
    /// A request carries `len` and no data; a reply carries `len` bytes of data.
    GetModuleIdData { module: u8, len: u8, data: Vec<u8> },
}

impl Command {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Data { .. } => Opcode::Data,
            Self::Stop { .. } => Opcode::Stop,
            Self::StartClockwise { .. } => Opcode::StartClockwise,
            Self::StartCounterClockwise { .. } => Opcode::StartCounterClockwise,
            Self::StartAutoSwitcher { .. } => Opcode::StartAutoSwitcher,
            Self::SetModuleIdData { .. } => Opcode::SetModuleIdData,
            Self::GetModuleIdData { .. } => Opcode::GetModuleIdData,
        }
    }

    /// Encode into a zero-initialised wire frame.
    pub fn encode(&self) -> Result<WireFrame> {
        match self {
            Self::Data {
                channel,
                flags,
                data,
            } => encode_data_raw(*channel, *flags, data),
            Self::Stop { channel } => Ok(encode_stop(*channel)),
            Self::StartClockwise { channel } => Ok(encode_start_clockwise(*channel)),
            Self::StartCounterClockwise { channel } => {
                Ok(encode_start_counter_clockwise(*channel))
            }
            Self::StartAutoSwitcher {
                channel,
                off_time,
                on_time,
                count,
            } => Ok(encode_start_auto_switcher(
                *channel, *off_time, *on_time, *count,
            )),
            Self::SetModuleIdData { module, data } => encode_set_module_data(*module, data),
            Self::GetModuleIdData { module, len, data } => {
                if data.len() > usize::from(*len) {
                    return Err(CodecError::ModuleDataTooLong {
                        len: data.len(),
                        max: usize::from(*len),
                    });
                }
                encode_module_frame(Opcode::GetModuleIdData, *module, *len, data)
            }
        }
    }
}

fn channel_frame(opcode: Opcode, channel: u8) -> WireFrame {
    let mut frame = WireFrame::new(opcode);
    let mut dst = frame.payload_mut();
    dst.put_u8(channel);
    frame
}

/// `STOP`: halt `channel`.
pub fn encode_stop(channel: u8) -> WireFrame {
    channel_frame(Opcode::Stop, channel)
}

pub fn encode_start_clockwise(channel: u8) -> WireFrame {
    channel_frame(Opcode::StartClockwise, channel)
}

pub fn encode_start_counter_clockwise(channel: u8) -> WireFrame {
    channel_frame(Opcode::StartCounterClockwise, channel)
}

/// `START_AUTO_SWITCHER`: toggle `channel` with the given off/on times for
/// `count` cycles.
pub fn encode_start_auto_switcher(
    channel: u8,
    off_time: u16,
    on_time: u16,
    count: u32,
) -> WireFrame {
    let mut frame = WireFrame::new(Opcode::StartAutoSwitcher);
    let mut dst = frame.payload_mut();
    dst.put_u8(channel);
    dst.put_u16_le(off_time);
    dst.put_u16_le(on_time);
    dst.put_u32_le(count);
    frame
}

/// `SET_MODULE_ID_DATA`: write up to 20 bytes of module data.
pub fn encode_set_module_data(module: u8, data: &[u8]) -> Result<WireFrame> {
    if data.len() > MAX_MODULE_DATA_LEN {
        return Err(CodecError::ModuleDataTooLong {
            len: data.len(),
            max: MAX_MODULE_DATA_LEN,
        });
    }
    encode_module_frame(Opcode::SetModuleIdData, module, data.len() as u8, data)
}

/// `GET_MODULE_ID_DATA`: request `len` bytes of module data. No data is sent.
pub fn encode_get_module_data(module: u8, len: u8) -> Result<WireFrame> {
    encode_module_frame(Opcode::GetModuleIdData, module, len, &[])
}

fn encode_module_frame(opcode: Opcode, module: u8, len: u8, data: &[u8]) -> Result<WireFrame> {
    if usize::from(len) > MAX_MODULE_DATA_LEN {
        return Err(CodecError::ModuleDataTooLong {
            len: usize::from(len),
            max: MAX_MODULE_DATA_LEN,
        });
    }
    let mut frame = WireFrame::new(opcode);
    let mut dst = frame.payload_mut();
    dst.put_u8(module);
    dst.put_u8(len);
    dst.put_slice(data);
    Ok(frame)
}

/// `DATA`: raw sample bytes tagged with their element width.
///
/// Devices send these; the host side only builds them for loopback and
/// simulation.
pub fn encode_data(channel: u8, tag: SizeTag, data: &[u8]) -> Result<WireFrame> {
    encode_data_raw(channel, tag.as_flags(), data)
}

fn encode_data_raw(channel: u8, flags: u8, data: &[u8]) -> Result<WireFrame> {
    if data.len() > MAX_DATA_LEN {
        return Err(CodecError::DataCountOutOfBounds {
            count: data.len(),
            max: MAX_DATA_LEN,
        });
    }
    let mut frame = WireFrame::new(Opcode::Data);
    let mut dst = frame.payload_mut();
    dst.put_u8(channel);
    dst.put_u8(flags);
    dst.put_u16_le(data.len() as u16);
    dst.put_slice(data);
    Ok(frame)
}

/// Parse the payload of a recognized frame back into a [`Command`].
///
/// Every field, including the data selected by a length field, must lie
/// within the bytes actually received; zero fill past the received length is
/// never read as data. Unknown header bytes yield [`CodecError::UnknownOpcode`].
pub fn parse_command(frame: &WireFrame) -> Result<Command> {
    let opcode = frame
        .opcode()
        .ok_or(CodecError::UnknownOpcode(frame.header()))?;
    let mut src = frame.payload();

    let command = match opcode {
        Opcode::Data => {
            require(frame, DATA_OFFSET)?;
            let channel = src.get_u8();
            let flags = src.get_u8();
            let count = usize::from(src.get_u16_le());
            if count > MAX_DATA_LEN {
                return Err(CodecError::DataCountOutOfBounds {
                    count,
                    max: MAX_DATA_LEN,
                });
            }
            require(frame, DATA_OFFSET + count)?;
            Command::Data {
                channel,
                flags,
                data: src[..count].to_vec(),
            }
        }
        Opcode::Stop => {
            require(frame, CHANNEL_OFFSET + 1)?;
            Command::Stop {
                channel: src.get_u8(),
            }
        }
        Opcode::StartClockwise => {
            require(frame, CHANNEL_OFFSET + 1)?;
            Command::StartClockwise {
                channel: src.get_u8(),
            }
        }
        Opcode::StartCounterClockwise => {
            require(frame, CHANNEL_OFFSET + 1)?;
            Command::StartCounterClockwise {
                channel: src.get_u8(),
            }
        }
        Opcode::StartAutoSwitcher => {
            require(frame, AUTO_COUNT_RANGE.end)?;
            Command::StartAutoSwitcher {
                channel: src.get_u8(),
                off_time: src.get_u16_le(),
                on_time: src.get_u16_le(),
                count: src.get_u32_le(),
            }
        }
        Opcode::SetModuleIdData => {
            require(frame, MODULE_DATA_OFFSET)?;
            let module = src.get_u8();
            let len = module_len(src.get_u8())?;
            require(frame, MODULE_DATA_OFFSET + len)?;
            Command::SetModuleIdData {
                module,
                data: src[..len].to_vec(),
            }
        }
        Opcode::GetModuleIdData => {
            require(frame, MODULE_DATA_OFFSET)?;
            let module = src.get_u8();
            let raw_len = src.get_u8();
            let len = module_len(raw_len)?;
            require(frame, MODULE_DATA_OFFSET + len)?;
            Command::GetModuleIdData {
                module,
                len: raw_len,
                data: src[..len].to_vec(),
            }
        }
    };

    Ok(command)
}

fn require(frame: &WireFrame, needed: usize) -> Result<()> {
    if needed > frame.received_len() {
        return Err(CodecError::ShortFrame {
            needed,
            received: frame.received_len(),
        });
    }
    Ok(())
}

fn module_len(raw: u8) -> Result<usize> {
    let len = usize::from(raw);
    if len > MAX_MODULE_DATA_LEN {
        return Err(CodecError::ModuleDataTooLong {
            len,
            max: MAX_MODULE_DATA_LEN,
        });
    }
    Ok(len)
}
