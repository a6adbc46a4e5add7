//! Host and simulated device exchanging frames over an in-memory async pipe.
//!
//! Run with: `cargo run -p gplink --example async-loopback --features async`

use futures_util::{SinkExt, StreamExt};
use gplink::frame::{encode_data, Command, Decoded, GpCodec, SizeTag, FRAME_SIZE};
use tokio_util::codec::{FramedRead, FramedWrite};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (host_io, device_io) = tokio::io::duplex(8 * FRAME_SIZE);
    let (host_rx, host_tx) = tokio::io::split(host_io);
    let (device_rx, device_tx) = tokio::io::split(device_io);

    let mut host_out = FramedWrite::new(host_tx, GpCodec::default());
    let mut host_in = FramedRead::new(host_rx, GpCodec::default());
    let mut device_in = FramedRead::new(device_rx, GpCodec::default());
    let mut device_out = FramedWrite::new(device_tx, GpCodec::default());

    let device = tokio::spawn(async move {
        // Answer every host command with one frame of 32-bit samples.
        while let Some(frame) = device_in.next().await {
            match frame? {
                Err(err) => println!("device dropped malformed frame: {err}"),
                Ok(Decoded::Ignored(reason)) => {
                    println!("device got command: {reason}");
                    let reply = encode_data(1, SizeTag::Bits32, &[1, 0, 0, 0, 2, 0, 0, 0])?;
                    device_out.send(reply).await?;
                }
                Ok(Decoded::Event(event)) => println!("device got event: {event:?}"),
            }
        }
        Ok::<_, gplink::CodecError>(())
    });

    host_out.send(Command::StartClockwise { channel: 1 }).await?;
    host_out.send(Command::Stop { channel: 1 }).await?;

    for _ in 0..2 {
        if let Some(decoded) = host_in.next().await {
            println!("host received: {:?}", decoded??);
        }
    }

    drop(host_out);
    drop(host_in);
    device.await??;
    Ok(())
}
