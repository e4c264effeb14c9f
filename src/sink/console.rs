//! Mirrors every line to a process stream so container log collectors pick it up.

use super::{Record, Sink};
use serde::Deserialize;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Which process stream a console sink targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
enum Target {
    Stream(ConsoleStream),
    /// Caller-supplied writer, shared by every channel of one registry.
    Writer(SharedWriter),
}

/// Line-at-a-time console output, flushed after each record.
#[derive(Clone)]
pub struct ConsoleSink {
    target: Target,
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let target = match &self.target {
            Target::Stream(ConsoleStream::Stdout) => "stdout",
            Target::Stream(ConsoleStream::Stderr) => "stderr",
            Target::Writer(_) => "writer",
        };
        f.debug_struct("ConsoleSink").field("target", &target).finish()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl ConsoleSink {
    #[must_use]
    pub const fn new(stream: ConsoleStream) -> Self {
        Self {
            target: Target::Stream(stream),
        }
    }

    #[must_use]
    pub const fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    #[must_use]
    pub const fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }

    /// Sends lines to an arbitrary writer instead of a process stream.
    /// Clones of the returned sink share the writer.
    #[must_use]
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            target: Target::Writer(Arc::new(Mutex::new(Box::new(writer)))),
        }
    }

    fn emit(out: &mut dyn Write, line: &str) -> io::Result<()> {
        writeln!(out, "{line}")?;
        out.flush()
    }
}

impl Sink for ConsoleSink {
    fn write(&self, _record: &Record, line: &str) -> Result<(), crate::Error> {
        match &self.target {
            Target::Stream(ConsoleStream::Stdout) => Self::emit(&mut io::stdout().lock(), line)?,
            Target::Stream(ConsoleStream::Stderr) => Self::emit(&mut io::stderr().lock(), line)?,
            Target::Writer(w) => {
                let mut guard = w.lock().unwrap_or_else(PoisonError::into_inner);
                Self::emit(&mut **guard, line)?;
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        match &self.target {
            Target::Stream(ConsoleStream::Stdout) => io::stdout().flush()?,
            Target::Stream(ConsoleStream::Stderr) => io::stderr().flush()?,
            Target::Writer(w) => w.lock().unwrap_or_else(PoisonError::into_inner).flush()?,
        }
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "console"
    }
}
