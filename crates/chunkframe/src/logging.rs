use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

/// Library crates whose verbosity `--framing-log-level` controls.
const FRAMING_TARGETS: [&str; 2] = ["chunkframe_frame", "chunkframe_transport"];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }

    fn is_verbose(self) -> bool {
        matches!(self, LogLevel::Debug | LogLevel::Trace)
    }
}

/// `level` applies everywhere; `framing`, when set, overrides it for the
/// framing and transport crates.
pub fn log_targets(level: LogLevel, framing: Option<LogLevel>) -> Targets {
    let mut targets = Targets::new().with_default(level.as_filter());
    if let Some(framing) = framing {
        for target in FRAMING_TARGETS {
            targets = targets.with_target(target, framing.as_filter());
        }
    }
    targets
}

/// Logs go to stderr so packet output on stdout stays machine-readable.
pub fn init_logging(format: LogFormat, level: LogLevel, framing: Option<LogLevel>) {
    let filter = log_targets(level, framing);
    let show_target = level.is_verbose() || framing.is_some_and(LogLevel::is_verbose);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(show_target);

    match format {
        LogFormat::Text => {
            let _ = tracing_subscriber::registry()
                .with(layer.with_filter(filter))
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::registry()
                .with(layer.json().with_filter(filter))
                .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn off_disables_everything() {
        assert_eq!(LogLevel::Off.as_filter(), LevelFilter::OFF);
        assert!(LogLevel::Trace.as_filter() > LogLevel::Info.as_filter());
    }

    #[test]
    fn framing_level_raises_library_targets_only() {
        let targets = log_targets(LogLevel::Warn, Some(LogLevel::Trace));

        assert!(targets.would_enable("chunkframe_frame::sequence", &Level::TRACE));
        assert!(targets.would_enable("chunkframe_transport::endpoint", &Level::DEBUG));
        assert!(!targets.would_enable("chunkframe::cmd::read", &Level::INFO));
        assert!(targets.would_enable("chunkframe::cmd::read", &Level::WARN));
    }

    #[test]
    fn framing_level_can_silence_library_targets() {
        let targets = log_targets(LogLevel::Info, Some(LogLevel::Off));

        assert!(!targets.would_enable("chunkframe_frame::reader", &Level::ERROR));
        assert!(targets.would_enable("chunkframe::cmd::read", &Level::INFO));
    }

    #[test]
    fn without_override_default_level_applies() {
        let targets = log_targets(LogLevel::Info, None);

        assert!(targets.would_enable("chunkframe_frame::fixed", &Level::INFO));
        assert!(!targets.would_enable("chunkframe_frame::fixed", &Level::DEBUG));
    }
}
