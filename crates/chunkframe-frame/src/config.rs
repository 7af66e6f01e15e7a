use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};

/// Default overflow ceiling: 4 KiB.
pub const DEFAULT_MAX_BYTES: usize = 4 * 1024;

/// Default fixed-mode packet length.
pub const DEFAULT_PACKET_LENGTH: usize = 1500;

/// Default end-of-packet sequence: `"\r\n:::"`.
pub const DEFAULT_DELIMITER: [u8; 5] = [13, 10, 58, 58, 58];

/// How packet boundaries are located in the byte stream.
///
/// Serialized with a `mode` tag:
///
/// ```json
/// { "mode": "fixed_delimiter", "start_byte": 170, "stop_byte": 85, "packet_length": 8 }
/// { "mode": "multi_byte_delimiter", "sequence": [13, 10, 58, 58, 58] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FramingConfig {
    /// Packets of exactly `packet_length` bytes, first byte `start_byte`,
    /// last byte `stop_byte`.
    FixedDelimiter {
        start_byte: u8,
        stop_byte: u8,
        packet_length: usize,
    },
    /// Variable-length packets terminated by `sequence`.
    MultiByteDelimiter { sequence: Vec<u8> },
}

impl FramingConfig {
    /// Smallest packet this framing can produce, in bytes.
    pub fn min_packet_len(&self) -> usize {
        match self {
            FramingConfig::FixedDelimiter { packet_length, .. } => *packet_length,
            FramingConfig::MultiByteDelimiter { sequence } => sequence.len(),
        }
    }

    /// Short name used in logs and CLI output.
    pub fn mode_name(&self) -> &'static str {
        match self {
            FramingConfig::FixedDelimiter { .. } => "fixed_delimiter",
            FramingConfig::MultiByteDelimiter { .. } => "multi_byte_delimiter",
        }
    }
}

impl Default for FramingConfig {
    fn default() -> Self {
        FramingConfig::MultiByteDelimiter {
            sequence: DEFAULT_DELIMITER.to_vec(),
        }
    }
}

/// Configuration of one stream session. Immutable once the session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Framing strategy.
    #[serde(default)]
    pub framing: FramingConfig,
    /// Overflow ceiling. Default: 4 KiB.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_BYTES
}

impl SessionConfig {
    /// Fixed-length framing with the default overflow ceiling.
    pub fn fixed(start_byte: u8, stop_byte: u8, packet_length: usize) -> Self {
        Self {
            framing: FramingConfig::FixedDelimiter {
                start_byte,
                stop_byte,
                packet_length,
            },
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Delimiter-terminated framing with the default overflow ceiling.
    pub fn delimited(sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            framing: FramingConfig::MultiByteDelimiter {
                sequence: sequence.into(),
            },
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Replace the overflow ceiling.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Reject configurations that can never emit a delimited packet.
    pub fn validate(&self) -> Result<()> {
        match &self.framing {
            FramingConfig::FixedDelimiter { packet_length, .. } if *packet_length == 0 => {
                return Err(FrameError::invalid_config("packet_length must be at least 1"));
            }
            FramingConfig::MultiByteDelimiter { sequence } if sequence.is_empty() => {
                return Err(FrameError::invalid_config(
                    "delimiter sequence must not be empty",
                ));
            }
            _ => {}
        }

        if self.max_bytes == 0 {
            return Err(FrameError::invalid_config("max_bytes must be at least 1"));
        }

        let min = self.framing.min_packet_len();
        if self.max_bytes < min {
            return Err(FrameError::invalid_config(format!(
                "max_bytes ({}) is smaller than the shortest packet ({min} bytes)",
                self.max_bytes
            )));
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            framing: FramingConfig::default(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}
