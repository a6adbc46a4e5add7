//! Absolute byte offsets of every field in a wire frame.
//!
//! ```text
//! offset  0        1        2        3..5        5..64
//! DATA    opcode   channel  flags    count (LE)  data
//! STOP    opcode   channel
//! AUTO    opcode   channel  off (LE) 2..4, on (LE) 4..6, count (LE) 6..10
//! MID     opcode   module   len      data 3..23
//! ```

use std::ops::Range;

/// Total size of one wire frame.
pub const FRAME_SIZE: usize = 64;

/// Header (opcode) size.
pub const HEADER_SIZE: usize = 1;

/// Bytes available to a payload after the header.
pub const PAYLOAD_SIZE: usize = FRAME_SIZE - HEADER_SIZE;

pub const OPCODE_OFFSET: usize = 0;
pub const CHANNEL_OFFSET: usize = 1;

pub const DATA_FLAGS_OFFSET: usize = 2;
pub const DATA_COUNT_RANGE: Range<usize> = 3..5;
pub const DATA_OFFSET: usize = 5;

/// Largest DATA byte count that fits in one frame.
pub const MAX_DATA_LEN: usize = FRAME_SIZE - DATA_OFFSET;

pub const AUTO_OFF_TIME_RANGE: Range<usize> = 2..4;
pub const AUTO_ON_TIME_RANGE: Range<usize> = 4..6;
pub const AUTO_COUNT_RANGE: Range<usize> = 6..10;

pub const MODULE_ID_OFFSET: usize = 1;
pub const MODULE_LEN_OFFSET: usize = 2;
pub const MODULE_DATA_OFFSET: usize = 3;

/// Fixed size of the module-id data field.
pub const MAX_MODULE_DATA_LEN: usize = 20;

pub const MODULE_DATA_RANGE: Range<usize> =
    MODULE_DATA_OFFSET..MODULE_DATA_OFFSET + MAX_MODULE_DATA_LEN;
