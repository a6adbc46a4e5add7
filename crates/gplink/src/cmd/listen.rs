use std::fs::File;

use gplink_frame::{decode_wire_frame, CodecConfig, CodecError, FrameReader};
use tracing::{debug, info};

use crate::cmd::ListenArgs;
use crate::exit::{codec_error, io_error, CliResult, SUCCESS};
use crate::output::{print_decoded, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat, config: CodecConfig) -> CliResult<i32> {
    let file = File::open(&args.path)
        .map_err(|err| io_error(&format!("failed opening {}", args.path.display()), err))?;
    let mut reader = FrameReader::with_config(file, config);

    let mut printed = 0usize;
    loop {
        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }

        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(CodecError::ConnectionClosed) => {
                if reader.buffered() > 0 {
                    debug!(trailing = reader.buffered(), "partial frame at end of input");
                }
                break;
            }
            Err(err) => return Err(codec_error("read failed", err)),
        };

        let decoded = decode_wire_frame(&frame, reader.config())
            .map_err(|err| codec_error(&format!("frame {printed} rejected"), err))?;
        print_decoded(Some(printed), &frame, &decoded, format);
        printed = printed.saturating_add(1);
    }

    info!(frames = printed, "listen finished");
    Ok(SUCCESS)
}
