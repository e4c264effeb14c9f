//! Destinations for formatted records. A channel formats each record once and
//! hands the same line to every attached sink.

mod compress;
mod console;
mod rotating;

pub use console::{ConsoleSink, ConsoleStream};
pub use rotating::{RotatingFileSink, RotationPolicy};

use crate::fmt::Fields;
use crate::level::Level;
use chrono::{DateTime, Local};
use std::sync::Arc;

/// Everything known about one emission, captured at the call site.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Local>,
    pub channel: String,
    pub level: Level,
    pub message: String,
    pub fields: Fields,
}

impl Record {
    /// Stamps the record with the current local time.
    #[must_use]
    pub fn now(channel: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            channel: channel.into(),
            level,
            message: message.into(),
            fields: Fields::new(),
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }
}

/// `Send + Sync` so a channel can be shared across threads behind an `Arc`.
pub trait Sink: Send + Sync {
    /// Persists or displays one already-formatted line. `line` carries no
    /// trailing newline; the sink terminates it.
    ///
    /// # Errors
    /// I/O errors from the underlying file or stream.
    fn write(&self, record: &Record, line: &str) -> Result<(), crate::Error>;

    /// # Errors
    /// I/O errors from the underlying file or stream.
    fn flush(&self) -> Result<(), crate::Error>;

    /// Short label used in diagnostics.
    fn kind(&self) -> &'static str;
}

/// One sink can back several channels, e.g. every module logger on `app.log`.
impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write(&self, record: &Record, line: &str) -> Result<(), crate::Error> {
        (**self).write(record, line)
    }

    fn flush(&self) -> Result<(), crate::Error> {
        (**self).flush()
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}
