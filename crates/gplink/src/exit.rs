use std::fmt;
use std::io;

use gplink_frame::CodecError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::Io(source) => io_error(context, source),
        CodecError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        CodecError::BufferTooLarge { .. }
        | CodecError::Truncated { .. }
        | CodecError::ShortFrame { .. }
        | CodecError::ModuleDataTooLong { .. }
        | CodecError::DataCountOutOfBounds { .. }
        | CodecError::UnknownOpcode(_)
        | CodecError::UnknownModule(_)
        | CodecError::ReservedSizeTag => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_bounds_errors_are_data_invalid() {
        let err = codec_error(
            "decode failed",
            CodecError::ModuleDataTooLong { len: 21, max: 20 },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode failed: module data too long"));
    }

    #[test]
    fn short_frame_is_data_invalid() {
        let err = codec_error(
            "decode failed",
            CodecError::ShortFrame {
                needed: 9,
                received: 6,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn io_errors_keep_their_class() {
        let err = codec_error(
            "read failed",
            CodecError::Io(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
