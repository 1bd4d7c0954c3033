//! Logging init: console sink with informational output on stdout and
//! warnings/errors on stderr.

use anyhow::Result;
use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: everything down to debug.
pub const DEFAULT_FILTER: &str = "debug";

/// Console stream a record ends up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Routes ERROR and WARN to stderr, everything else to stdout.
pub fn stream_for(level: &Level) -> Stream {
    match *level {
        Level::ERROR | Level::WARN => Stream::Stderr,
        _ => Stream::Stdout,
    }
}

/// Writer handed out per record; locks the chosen stream for the write.
pub enum ConsoleWriter {
    Stdout(io::Stdout),
    Stderr(io::Stderr),
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ConsoleWriter::Stdout(s) => s.lock().write(buf),
            ConsoleWriter::Stderr(s) => s.lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ConsoleWriter::Stdout(s) => s.lock().flush(),
            ConsoleWriter::Stderr(s) => s.lock().flush(),
        }
    }
}

/// `MakeWriter` that picks stdout or stderr from the record's level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl ConsoleMakeWriter {
    fn writer(stream: Stream) -> ConsoleWriter {
        match stream {
            Stream::Stdout => ConsoleWriter::Stdout(io::stdout()),
            Stream::Stderr => ConsoleWriter::Stderr(io::stderr()),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        Self::writer(Stream::Stdout)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        Self::writer(stream_for(meta.level()))
    }
}

/// Install the console subscriber. `RUST_LOG` overrides [`DEFAULT_FILTER`].
/// Fails if a global subscriber is already set.
pub fn init_console_logging() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(ConsoleMakeWriter)
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install console logger: {}", e))?;

    Ok(())
}
