//! chanlog's own diagnostics: directory creation, sink attachment, rotation
//! and write failures. Lines go to stderr in the regular line format under
//! channel names like `chanlog.rotate`.
//!
//! Uses `OnceLock` so the threshold is fixed exactly once, even if several
//! registries race to initialize it. Calls made before any registry exists
//! initialize the defaults (WARNING and above).

use crate::config::Config;
use crate::fmt::Formatter;
use crate::level::Level;
use crate::sink::{ConsoleSink, Record, Sink};
use std::sync::OnceLock;

static INTERNAL_LOGGER: OnceLock<InternalLogger> = OnceLock::new();

struct InternalLogger {
    level: Level,
    formatter: Formatter,
    sink: ConsoleSink,
}

impl InternalLogger {
    fn new(level: Level, formatter: Formatter) -> Self {
        Self {
            level,
            formatter,
            sink: ConsoleSink::stderr(),
        }
    }
}

impl Default for InternalLogger {
    fn default() -> Self {
        Self::new(Level::Warning, Formatter::new())
    }
}

/// Fixes the diagnostic threshold and timestamp format from `config`.
/// Only the first initialization takes effect.
pub fn init_with_config(config: &Config) {
    let was_init = INTERNAL_LOGGER.get().is_some();
    INTERNAL_LOGGER.get_or_init(|| {
        InternalLogger::new(
            config.general.internal_level,
            Formatter::new().timestamp_format(&config.format.timestamp_format),
        )
    });
    if !was_init {
        debug(
            "INTERNAL",
            &format!("Diagnostics at {}", config.general.internal_level),
        );
    }
}

fn log(level: Level, scope: &str, msg: &str) {
    let logger = INTERNAL_LOGGER.get_or_init(InternalLogger::default);
    if level < logger.level {
        return;
    }

    let record = Record::now(format!("chanlog.{}", scope.to_lowercase()), level, msg);
    let line = logger.formatter.format(&record);
    // Nowhere left to report a failure to write diagnostics
    let _ = logger.sink.write(&record, &line);
}

pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

pub fn warn(scope: &str, msg: &str) {
    log(Level::Warning, scope, msg);
}

pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
