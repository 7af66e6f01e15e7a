use std::path::PathBuf;
use std::time::Duration;

use chunkframe_frame::{SessionConfig, DEFAULT_PACKET_LENGTH, DEFAULT_READ_CHUNK_SIZE};
use clap::{Args, Subcommand};

use crate::exit::{config_error, io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod read;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a byte stream and print the packets framed from it.
    Read(ReadArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Read(args) => read::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Byte source: tcp://host:port, host:port, unix:///path, a device or file path, or `-` for stdin.
    pub endpoint: String,
    #[command(flatten)]
    pub framing: FramingArgs,
    /// Exit after printing N packets.
    #[arg(long)]
    pub count: Option<u64>,
    /// Do not print overflow packets.
    #[arg(long)]
    pub skip_overflow: bool,
    /// Print session counters once the stream ends.
    #[arg(long)]
    pub stats: bool,
    /// Socket read timeout, also the Ctrl-C poll interval (e.g. 500ms, 2s).
    #[arg(long, default_value = "500ms")]
    pub read_timeout: String,
    /// Connection timeout for tcp endpoints (e.g. 5s).
    #[arg(long)]
    pub connect_timeout: Option<String>,
    /// Maximum bytes requested per read.
    #[arg(long, default_value_t = DEFAULT_READ_CHUNK_SIZE)]
    pub chunk_size: usize,
}

#[derive(Args, Debug)]
pub struct FramingArgs {
    /// JSON session config file.
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["delimiter", "start_byte", "stop_byte", "packet_length"]
    )]
    pub config: Option<PathBuf>,
    /// Terminating byte sequence (comma-separated, decimal or 0x hex).
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = parse_byte,
        conflicts_with_all = ["start_byte", "stop_byte", "packet_length"]
    )]
    pub delimiter: Option<Vec<u8>>,
    /// First byte of a fixed-length packet.
    #[arg(long, value_parser = parse_byte, requires = "stop_byte")]
    pub start_byte: Option<u8>,
    /// Last byte of a fixed-length packet.
    #[arg(long, value_parser = parse_byte, requires = "start_byte")]
    pub stop_byte: Option<u8>,
    /// Fixed packet length, delimiters included.
    #[arg(long, requires = "start_byte")]
    pub packet_length: Option<usize>,
    /// Overflow ceiling for the accumulation buffer.
    #[arg(long, env = "CHUNKFRAME_MAX_BYTES")]
    pub max_bytes: Option<usize>,
}

impl FramingArgs {
    /// Build the session config from the config file or the framing flags.
    /// `--max-bytes` overrides the file's ceiling.
    pub fn session_config(&self) -> CliResult<SessionConfig> {
        let mut config = if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .map_err(|err| io_error(&format!("read {}", path.display()), err))?;
            serde_json::from_str::<SessionConfig>(&text)
                .map_err(|err| config_error(&format!("parse {}", path.display()), err))?
        } else if let (Some(start), Some(stop)) = (self.start_byte, self.stop_byte) {
            SessionConfig::fixed(
                start,
                stop,
                self.packet_length.unwrap_or(DEFAULT_PACKET_LENGTH),
            )
        } else if let Some(sequence) = &self.delimiter {
            SessionConfig::delimited(sequence.clone())
        } else {
            SessionConfig::default()
        };

        if let Some(max_bytes) = self.max_bytes {
            config = config.with_max_bytes(max_bytes);
        }
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_byte(input: &str) -> Result<u8, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse::<u8>(),
    };
    parsed.map_err(|_| format!("invalid byte value: {input} (expected 0-255 or 0x00-0xff)"))
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use chunkframe_frame::{FramingConfig, DEFAULT_MAX_BYTES};

    use super::*;

    fn framing() -> FramingArgs {
        FramingArgs {
            config: None,
            delimiter: None,
            start_byte: None,
            stop_byte: None,
            packet_length: None,
            max_bytes: None,
        }
    }

    #[test]
    fn parse_byte_accepts_decimal_and_hex() {
        assert_eq!(parse_byte("13"), Ok(13));
        assert_eq!(parse_byte("0x3a"), Ok(58));
        assert_eq!(parse_byte("0XFF"), Ok(255));
        assert!(parse_byte("256").is_err());
        assert!(parse_byte("0xzz").is_err());
    }

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn no_flags_yields_default_session() {
        let config = framing().session_config().unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn fixed_flags_build_fixed_framing() {
        let args = FramingArgs {
            start_byte: Some(0xAA),
            stop_byte: Some(0x55),
            max_bytes: Some(64),
            ..framing()
        };
        let config = args.session_config().unwrap();
        assert_eq!(
            config.framing,
            FramingConfig::FixedDelimiter {
                start_byte: 0xAA,
                stop_byte: 0x55,
                packet_length: DEFAULT_PACKET_LENGTH,
            }
        );
        assert_eq!(config.max_bytes, 64);
    }

    #[test]
    fn config_file_is_loaded_and_ceiling_overridden() {
        let path = std::env::temp_dir().join(format!(
            "chunkframe-config-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{"framing":{"mode":"multi_byte_delimiter","sequence":[59]},"max_bytes":32}"#,
        )
        .unwrap();

        let file_only = FramingArgs {
            config: Some(path.clone()),
            ..framing()
        };
        let config = file_only.session_config().unwrap();
        assert_eq!(config, SessionConfig::delimited(vec![59]).with_max_bytes(32));

        let overridden = FramingArgs {
            config: Some(path.clone()),
            max_bytes: Some(DEFAULT_MAX_BYTES),
            ..framing()
        };
        assert_eq!(overridden.session_config().unwrap().max_bytes, DEFAULT_MAX_BYTES);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_config_file_is_data_invalid() {
        let path = std::env::temp_dir().join(format!(
            "chunkframe-bad-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{\"framing\":").unwrap();

        let args = FramingArgs {
            config: Some(path.clone()),
            ..framing()
        };
        let err = args.session_config().unwrap_err();
        assert_eq!(err.code, crate::exit::DATA_INVALID);

        let _ = std::fs::remove_file(path);
    }
}
