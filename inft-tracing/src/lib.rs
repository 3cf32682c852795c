//! Tracing setup and status-line helpers shared between the iNFT deployment crates.

use ansi_term::Colour;
use std::{env, io};
use tracing::{Level, Metadata};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{MakeWriter, TestWriter},
};

/// Prints a cargo-style status line, e.g. `    Deployed AliERC20v2 at 0x5fbd...`.
pub fn println_action_green(action: &str, txt: &str) {
    tracing::info!(
        "{} {}",
        Colour::Green.bold().paint(format!("{action:>12}")),
        txt
    );
}

/// Same as [println_action_green], for steps that change permissions rather than deploy code.
pub fn println_action_yellow(action: &str, txt: &str) {
    tracing::info!(
        "{} {}",
        Colour::Yellow.bold().paint(format!("{action:>12}")),
        txt
    );
}

pub fn println_warning(txt: &str) {
    tracing::warn!("{}: {}", Colour::Yellow.bold().paint("warning"), txt);
}

const LOG_FILTER: &str = "RUST_LOG";

// ERROR and WARN go to stderr, everything else to stdout, unless a fixed mode is requested.
struct StdioTracingWriter {
    writer_mode: TracingWriterMode,
}

impl<'a> MakeWriter<'a> for StdioTracingWriter {
    type Writer = Box<dyn io::Write>;

    fn make_writer(&'a self) -> Self::Writer {
        match self.writer_mode {
            TracingWriterMode::Stderr => Box::new(io::stderr()),
            TracingWriterMode::Test => Box::new(TestWriter::new()),
            TracingWriterMode::Stdio | TracingWriterMode::Stdout => Box::new(io::stdout()),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        if self.writer_mode == TracingWriterMode::Stdio && meta.level() <= &Level::WARN {
            return Box::new(io::stderr());
        }
        self.make_writer()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingWriterMode {
    /// Write ERROR and WARN to stderr and everything else to stdout.
    Stdio,
    /// Write everything to stdout.
    Stdout,
    /// Write everything to stderr.
    Stderr,
    /// Write through libtest's captured output, so logs only show for failing tests.
    Test,
}

#[derive(Debug, Default)]
pub struct TracingSubscriberOptions {
    pub verbosity: Option<u8>,
    pub silent: Option<bool>,
    pub log_level: Option<LevelFilter>,
    pub writer_mode: Option<TracingWriterMode>,
}

impl TracingSubscriberOptions {
    /// Options used by integration tests: captured output, `RUST_LOG` decides the level.
    pub fn for_tests() -> Self {
        Self {
            writer_mode: Some(TracingWriterMode::Test),
            ..Default::default()
        }
    }

    /// The explicit level override, if any. Takes precedence over `RUST_LOG`.
    fn level_override(&self) -> Option<LevelFilter> {
        self.log_level
            .or_else(|| match self.verbosity {
                Some(1) => Some(LevelFilter::DEBUG), // -v
                Some(2) => Some(LevelFilter::TRACE), // -vv
                _ => None,
            })
            .or_else(|| match self.silent {
                Some(true) => Some(LevelFilter::OFF),
                _ => None,
            })
    }
}

/// A subscriber built from default `tracing_subscriber::fmt::SubscriberBuilder` such that it
/// reads like plain `println!` output.
///
/// `RUST_LOG` can be used to set a different minimum level, the default is `INFO`. Installing a
/// subscriber twice is a no-op, so every test may call this from its setup.
pub fn init_tracing_subscriber(options: TracingSubscriberOptions) {
    let env_filter = match env::var_os(LOG_FILTER) {
        Some(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::new("info"),
    };

    let builder = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_ansi(options.writer_mode != Some(TracingWriterMode::Test))
        .with_level(false)
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .with_target(false)
        .with_writer(StdioTracingWriter {
            writer_mode: options.writer_mode.unwrap_or(TracingWriterMode::Stdio),
        });

    // An explicit level beats RUST_LOG.
    let _ = match options.level_override() {
        Some(level_filter) => builder.with_max_level(level_filter).try_init(),
        None => builder.try_init(),
    };
}
