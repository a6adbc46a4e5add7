use std::fs::OpenOptions;
use std::path::Path;

use gplink_frame::{
    encode_data, encode_get_module_data, encode_set_module_data, encode_start_auto_switcher,
    encode_start_clockwise, encode_start_counter_clockwise, encode_stop, is_single_channel,
    FrameWriter, WireFrame, CHANNEL_ALL,
};
use tracing::{debug, warn};

use crate::cmd::{EncodeArgs, EncodeCommand};
use crate::exit::{codec_error, io_error, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = build_frame(args.command)?;

    match &args.out {
        Some(path) => write_frame(path, &frame)?,
        None => print_frame(&frame, format),
    }

    Ok(SUCCESS)
}

fn build_frame(command: EncodeCommand) -> CliResult<WireFrame> {
    let frame = match command {
        EncodeCommand::Stop { channel } => {
            check_channel(channel);
            encode_stop(channel)
        }
        EncodeCommand::Clockwise { channel } => {
            check_channel(channel);
            encode_start_clockwise(channel)
        }
        EncodeCommand::CounterClockwise { channel } => {
            check_channel(channel);
            encode_start_counter_clockwise(channel)
        }
        EncodeCommand::AutoSwitcher {
            channel,
            off_time,
            on_time,
            count,
        } => {
            check_channel(channel);
            encode_start_auto_switcher(channel, off_time, on_time, count)
        }
        EncodeCommand::SetModule { module, data } => encode_set_module_data(module, &data.0)
            .map_err(|err| codec_error("encode failed", err))?,
        EncodeCommand::GetModule { module, len } => encode_get_module_data(module, len)
            .map_err(|err| codec_error("encode failed", err))?,
        EncodeCommand::Data { channel, tag, data } => encode_data(channel, tag.into(), &data.0)
            .map_err(|err| codec_error("encode failed", err))?,
    };
    Ok(frame)
}

// The device decides what out-of-range channels mean; only warn.
fn check_channel(channel: u8) {
    if !is_single_channel(channel) && channel != CHANNEL_ALL {
        warn!(channel, "channel outside 0..=7 and not the all-channels value");
    }
}

fn write_frame(path: &Path, frame: &WireFrame) -> CliResult<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;

    let mut writer = FrameWriter::new(file);
    writer
        .write_frame(frame)
        .map_err(|err| codec_error("write failed", err))?;
    debug!(path = %path.display(), header = frame.header(), "frame written");
    Ok(())
}
