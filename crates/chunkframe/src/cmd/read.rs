use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chunkframe_frame::{FramingSession, Packet, PacketReader, ReaderConfig};
use chunkframe_transport::Endpoint;
use tracing::{info, warn};

use crate::cmd::{parse_duration, ReadArgs};
use crate::exit::{frame_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_packet, print_stats, OutputFormat};

pub fn run(args: ReadArgs, format: OutputFormat) -> CliResult<i32> {
    if args.chunk_size == 0 {
        return Err(CliError::new(USAGE, "chunk size must be greater than zero"));
    }
    if args.count == Some(0) {
        return Ok(SUCCESS);
    }

    let endpoint: Endpoint = args
        .endpoint
        .parse()
        .map_err(|err| transport_error("invalid endpoint", err))?;
    let read_timeout = parse_duration(&args.read_timeout)?;
    let connect_timeout = args
        .connect_timeout
        .as_deref()
        .map(parse_duration)
        .transpose()?;

    let config = args.framing.session_config()?;
    let session =
        FramingSession::new(config).map_err(|err| frame_error("invalid framing", err))?;

    let stream = endpoint
        .open(connect_timeout)
        .map_err(|err| transport_error("open failed", err))?;
    let source = stream.describe().to_string();
    info!(
        source = %source,
        mode = session.config().framing.mode_name(),
        max_bytes = session.config().max_bytes,
        "reading stream"
    );

    let reader_config = ReaderConfig {
        chunk_size: args.chunk_size,
        read_timeout: Some(read_timeout),
    };
    let mut reader = PacketReader::with_config_stream(stream, session, reader_config)
        .map_err(|err| frame_error("configure failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let limit_reached = |printed: u64| args.count.is_some_and(|count| printed >= count);
    let mut printed = 0u64;
    let stop = Arc::clone(&running);
    let mut sink = |packet: Packet| {
        if limit_reached(printed) {
            return;
        }
        if packet.is_overflow() {
            warn!(size = packet.len(), source = %source, "buffer overflow flushed");
            if args.skip_overflow {
                return;
            }
        }

        printed += 1;
        print_packet(printed, &packet, &source, format);

        if limit_reached(printed) {
            stop.store(false, Ordering::SeqCst);
        }
    };

    let stats = reader
        .run(&mut sink, &running)
        .map_err(|err| frame_error("read failed", err))?;

    info!(
        chunks = stats.chunks,
        bytes_in = stats.bytes_in,
        packets = stats.packets,
        overflows = stats.overflows,
        discarded = stats.discarded,
        "stream finished"
    );
    if args.stats {
        print_stats(&stats, format);
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
