//! Host and simulated device talking over an in-memory byte stream.
//!
//! Run with: `cargo run -p gplink --example loopback`

use std::io::Cursor;

use gplink::frame::{
    encode_data, Command, EventSink, FrameReader, FrameWriter, GeneralProtocol, SizeTag,
    FRAME_SIZE,
};

struct PrintSink;

impl EventSink for PrintSink {
    fn data16(&mut self, channel: u8, values: Vec<u16>) {
        println!("channel {channel}: {values:?}");
    }

    fn rgb_cap_module_data(&mut self, data: Vec<u8>) {
        println!("rgb capture module data: {data:02x?}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Host side: queue a few commands for the device.
    let mut host = GeneralProtocol::new(PrintSink, FrameWriter::new(Vec::<u8>::new()));
    host.send_start_clockwise(2)?;
    host.send_start_auto_switcher(3, 250, 750, 10)?;
    host.send_get_module_data(1, 4)?;
    let (_, writer) = host.into_parts();
    let outbound = writer.into_inner();
    println!("host sent {} frames", outbound.len() / FRAME_SIZE);

    // Device side: answer with samples and the requested module data.
    let mut device = FrameWriter::new(Vec::<u8>::new());
    device.write_frame(&encode_data(2, SizeTag::Bits16, &[0x10, 0x00, 0x20, 0x00])?)?;
    device.send(&Command::GetModuleIdData {
        module: 1,
        len: 4,
        data: vec![0xDE, 0xAD, 0xBE, 0xEF],
    })?;
    let inbound = device.into_inner();

    // Host side again: decode the replies.
    let mut reader = FrameReader::new(Cursor::new(inbound));
    let mut sink = PrintSink;
    for _ in 0..2 {
        if let Some(event) = reader.next_decoded()?.into_event() {
            gplink::frame::dispatch(event, &mut sink);
        }
    }

    Ok(())
}
