use std::fmt::Write as _;
use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use chunkframe_frame::{Packet, SessionStats};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PacketOutput<'a> {
    seq: u64,
    kind: &'a str,
    size: usize,
    hex: String,
    text: Option<&'a str>,
    source: &'a str,
    timestamp: String,
}

pub fn print_packet(seq: u64, packet: &Packet, source: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PacketOutput {
                seq,
                kind: packet.kind.as_str(),
                size: packet.len(),
                hex: hex_dump(packet.as_ref()),
                text: std::str::from_utf8(packet.as_ref()).ok(),
                source,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SEQ", "KIND", "SIZE", "SOURCE", "PAYLOAD"])
                .add_row(vec![
                    seq.to_string(),
                    packet.kind.as_str().to_string(),
                    packet.len().to_string(),
                    source.to_string(),
                    payload_preview(packet.as_ref()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "#{} kind={} size={} source={} payload={}",
                seq,
                packet.kind.as_str(),
                packet.len(),
                source,
                payload_preview(packet.as_ref())
            );
        }
        OutputFormat::Raw => {
            print_raw(packet.as_ref());
        }
    }
}

pub fn print_stats(stats: &SessionStats, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(stats).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["CHUNKS", "BYTES IN", "PACKETS", "OVERFLOWS", "DISCARDED"])
                .add_row(vec![
                    stats.chunks.to_string(),
                    stats.bytes_in.to_string(),
                    stats.packets.to_string(),
                    stats.overflows.to_string(),
                    stats.discarded.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "chunks={} bytes_in={} packets={} overflows={} discarded={}",
                stats.chunks, stats.bytes_in, stats.packets, stats.overflows, stats.discarded
            );
        }
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.escape_debug().to_string(),
        Err(_) => hex_dump(payload),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
