use gplink_frame::{decode_with_config, CodecConfig, WireFrame};
use tracing::debug;

use crate::cmd::{missing_input, read_input_file, DecodeArgs};
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{print_decoded, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat, config: CodecConfig) -> CliResult<i32> {
    let bytes = match (args.hex, &args.file) {
        (Some(hex), _) => hex.0,
        (None, Some(path)) => read_input_file(path)?,
        (None, None) => return Err(missing_input()),
    };
    debug!(size = bytes.len(), strict = config.strict, "decoding frame");

    let decoded = decode_with_config(&bytes, bytes.len(), &config)
        .map_err(|err| codec_error("decode failed", err))?;
    // Decode already rejected anything longer than one frame.
    let frame = WireFrame::from_slice(&bytes).map_err(|err| codec_error("decode failed", err))?;

    print_decoded(None, &frame, &decoded, format);
    Ok(SUCCESS)
}
