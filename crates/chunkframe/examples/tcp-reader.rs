//! Frames a local TCP stream that delivers packets in awkward chunk sizes.
//!
//! Run with:
//!   cargo run --example tcp-reader
//!
//! A writer thread sends three packets split at arbitrary points; the reader
//! thread frames them and hands each packet to the main thread over a channel.

use std::io::Write;
use std::net::TcpListener;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chunkframe::frame::{FramingSession, PacketReader, ReaderConfig, SessionConfig};
use chunkframe::transport::Endpoint;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    let writer = thread::spawn(move || -> std::io::Result<()> {
        let (mut conn, _) = listener.accept()?;
        let chunks: [&[u8]; 4] = [b"temp=2", b"1.5\r\n:", b"::hum=40\r\n:::pres", b"=1013\r\n:::"];
        for chunk in chunks {
            conn.write_all(chunk)?;
            thread::sleep(Duration::from_millis(20));
        }
        Ok(())
    });

    let stream = Endpoint::Tcp(addr.to_string()).open(Some(Duration::from_secs(2)))?;
    let session = FramingSession::new(SessionConfig::default())?;
    let config = ReaderConfig {
        read_timeout: Some(Duration::from_millis(200)),
        ..ReaderConfig::default()
    };
    let mut reader = PacketReader::with_config_stream(stream, session, config)?;

    let (tx, rx) = mpsc::channel();
    let framing = thread::spawn(move || {
        let mut sink = tx;
        reader.run(&mut sink, &AtomicBool::new(true))
    });

    for packet in rx {
        let text = String::from_utf8_lossy(packet.as_ref());
        println!("{:>8} {:>3} bytes  {}", packet.kind.as_str(), packet.len(), text.trim_end());
    }

    writer.join().map_err(|_| "writer thread panicked")??;
    let stats = framing.join().map_err(|_| "framing thread panicked")??;
    eprintln!(
        "chunks={} bytes_in={} packets={}",
        stats.chunks, stats.bytes_in, stats.packets
    );
    Ok(())
}
