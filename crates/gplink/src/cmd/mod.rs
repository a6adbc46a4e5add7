use clap::{Args, Subcommand, ValueEnum};
use gplink_frame::{CodecConfig, SizeTag};
use std::path::PathBuf;

use crate::exit::{CliError, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod listen;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a host-to-device frame.
    Encode(EncodeArgs),
    /// Decode a single received frame.
    Decode(DecodeArgs),
    /// Read frames from a device or capture file and print each outcome.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, config: CodecConfig) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format, config),
        Command::Listen(args) => listen::run(args, format, config),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(subcommand)]
    pub command: EncodeCommand,
    /// Write the frame to a device or file instead of printing it.
    #[arg(long, value_name = "PATH", global = true)]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum EncodeCommand {
    /// Halt a channel.
    Stop { channel: u8 },
    /// Start a channel turning clockwise.
    Clockwise { channel: u8 },
    /// Start a channel turning counter-clockwise.
    CounterClockwise { channel: u8 },
    /// Toggle a channel on a timed cycle.
    AutoSwitcher {
        channel: u8,
        /// Off time per cycle.
        #[arg(long)]
        off_time: u16,
        /// On time per cycle.
        #[arg(long)]
        on_time: u16,
        /// Number of cycles.
        #[arg(long, default_value = "0")]
        count: u32,
    },
    /// Write module-id data (hex, up to 20 bytes).
    SetModule {
        module: u8,
        #[arg(value_parser = parse_hex)]
        data: HexBytes,
    },
    /// Request module-id data.
    GetModule {
        module: u8,
        /// Number of bytes requested (up to 20).
        #[arg(long)]
        len: u8,
    },
    /// Build a channel data frame (device side, for simulation).
    Data {
        channel: u8,
        /// Element width.
        #[arg(long, value_enum, default_value = "8")]
        tag: TagArg,
        #[arg(value_parser = parse_hex)]
        data: HexBytes,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum TagArg {
    #[value(name = "8")]
    Bits8,
    #[value(name = "16")]
    Bits16,
    #[value(name = "32")]
    Bits32,
}

impl From<TagArg> for SizeTag {
    fn from(tag: TagArg) -> Self {
        match tag {
            TagArg::Bits8 => SizeTag::Bits8,
            TagArg::Bits16 => SizeTag::Bits16,
            TagArg::Bits32 => SizeTag::Bits32,
        }
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex (whitespace allowed).
    #[arg(conflicts_with = "file", required_unless_present = "file", value_parser = parse_hex)]
    pub hex: Option<HexBytes>,
    /// Read the frame from a binary file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Device or capture file to read frames from.
    pub path: PathBuf,
    /// Exit after N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Bytes parsed from a hex argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

pub fn parse_hex(input: &str) -> Result<HexBytes, String> {
    let digits: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);

    hex::decode(digits)
        .map(HexBytes)
        .map_err(|err| format!("invalid hex: {err}"))
}

pub(crate) fn read_input_file(path: &std::path::Path) -> CliResult<Vec<u8>> {
    std::fs::read(path).map_err(|err| {
        crate::exit::io_error(&format!("failed reading {}", path.display()), err)
    })
}

pub(crate) fn missing_input() -> CliError {
    CliError::usage("either a hex frame or --file is required")
}
