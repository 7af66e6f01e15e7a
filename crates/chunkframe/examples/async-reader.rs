//! Frames a tokio TCP stream with `PacketCodec`.
//!
//! Run with:
//!   cargo run --example async-reader --features async

use chunkframe::frame::{PacketCodec, SessionConfig};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::FramedRead;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let writer = tokio::spawn(async move {
        let (mut conn, _) = listener.accept().await?;
        // Fixed 6-byte packets with a leading byte of noise.
        conn.write_all(&[0x00, 0xAA, b'o', b'n']).await?;
        conn.write_all(&[b'e', b'!', 0x55, 0xAA, b't', b'w', b'o', b'!', 0x55]).await?;
        conn.shutdown().await
    });

    let stream = TcpStream::connect(addr).await?;
    let codec = PacketCodec::new(SessionConfig::fixed(0xAA, 0x55, 6).with_max_bytes(64))?;
    let mut framed = FramedRead::new(stream, codec);

    while let Some(packet) = framed.next().await {
        let packet = packet?;
        println!("{} {:02x?}", packet.kind.as_str(), packet.as_ref());
    }

    writer.await??;
    let stats = framed.decoder().session().stats();
    println!("packets={} discarded={}", stats.packets, stats.discarded);
    Ok(())
}
