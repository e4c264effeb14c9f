//! A named stream with a severity threshold that fans each record out to its
//! sinks. The threshold can change after creation; the sink list cannot.

use crate::fmt::{Fields, Formatter};
use crate::internal;
use crate::level::Level;
use crate::sink::{Record, Sink};
use std::sync::atomic::{AtomicU8, Ordering};

struct Attached {
    /// Fixed when the sink is attached; later `set_level` calls don't touch it.
    level: Level,
    sink: Box<dyn Sink>,
}

/// Shared behind an `Arc` by the registry; every method takes `&self`.
pub struct Channel {
    name: String,
    level: AtomicU8,
    formatter: Formatter,
    sinks: Vec<Attached>,
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("level", &self.level())
            .field(
                "sinks",
                &self.sinks.iter().map(|a| a.sink.kind()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Channel {
    /// A channel without sinks. Standalone channels are useful with custom
    /// sinks; registry channels get theirs from `Registry::configure`.
    #[must_use]
    pub fn new(name: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            level: AtomicU8::new(level as u8),
            formatter: Formatter::new(),
            sinks: Vec::new(),
        }
    }

    #[must_use]
    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Attaches `sink`, which only receives records at or above `level`.
    #[must_use]
    pub fn sink(mut self, level: Level, sink: impl Sink + 'static) -> Self {
        self.sinks.push(Attached {
            level,
            sink: Box::new(sink),
        });
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Formats the record once and hands the line to every sink whose own
    /// threshold it meets. Below the channel threshold nothing happens.
    /// Sink failures are reported to diagnostics, never to the caller.
    pub fn log_with(&self, level: Level, msg: &str, fields: Fields) {
        if !self.is_enabled(level) {
            return;
        }

        let record = Record::now(self.name.as_str(), level, msg).with_fields(fields);
        let line = self.formatter.format(&record);

        for attached in &self.sinks {
            if level < attached.level {
                continue;
            }
            if let Err(e) = attached.sink.write(&record, &line) {
                internal::error(
                    "CHANNEL",
                    &format!("{} {} sink write failed: {e}", self.name, attached.sink.kind()),
                );
            }
        }
    }

    pub fn log(&self, level: Level, msg: &str) {
        self.log_with(level, msg, Fields::new());
    }

    pub fn debug(&self, msg: &str) {
        self.log(Level::Debug, msg);
    }

    pub fn info(&self, msg: &str) {
        self.log(Level::Info, msg);
    }

    pub fn warning(&self, msg: &str) {
        self.log(Level::Warning, msg);
    }

    pub fn error(&self, msg: &str) {
        self.log(Level::Error, msg);
    }

    pub fn critical(&self, msg: &str) {
        self.log(Level::Critical, msg);
    }

    /// # Errors
    /// Returns the first I/O error encountered across all sinks.
    pub fn flush(&self) -> Result<(), crate::Error> {
        for attached in &self.sinks {
            attached.sink.flush()?;
        }
        Ok(())
    }
}
