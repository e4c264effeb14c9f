//! Configuration struct definitions.

use crate::fmt::{FormatTemplate, Formatter};
use crate::level::Level;
use crate::llm::{LLM_CHANNEL, LLM_LOG_FILE};
use crate::sink::{ConsoleStream, RotationPolicy};
use serde::Deserialize;

/// General configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding every channel's log files. `~` is expanded.
    pub log_dir: String,
    /// Threshold for chanlog's own diagnostics on stderr.
    pub internal_level: Level,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            internal_level: Level::Warning,
        }
    }
}

/// Rotation limits for every rotating file sink.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Size limit of the active file in bytes.
    pub max_bytes: u64,
    /// Human-readable alternative to `max_bytes` ("10M", "512K"). Wins when set and valid.
    pub max_size: Option<String>,
    /// Archived generations to keep.
    pub backup_count: usize,
    /// Gzip archived generations.
    pub compress: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_bytes: RotationPolicy::DEFAULT_MAX_BYTES,
            max_size: None,
            backup_count: RotationPolicy::DEFAULT_BACKUP_COUNT,
            compress: false,
        }
    }
}

/// Line layout shared by file and console sinks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Placeholders: `{timestamp}`, `{channel}`, `{level}`, `{msg}`, `{fields}`.
    pub layout: String,
    /// chrono strftime string.
    pub timestamp_format: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            layout: FormatTemplate::DEFAULT_LAYOUT.to_string(),
            timestamp_format: Formatter::DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Console mirroring.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Attach a console sink to new channels.
    pub enabled: bool,
    /// `stdout` or `stderr`.
    pub stream: ConsoleStream,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stream: ConsoleStream::Stdout,
        }
    }
}

/// Names used by the LLM analytics channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub channel: String,
    pub file: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            channel: LLM_CHANNEL.to_string(),
            file: LLM_LOG_FILE.to_string(),
        }
    }
}

/// Per-channel overrides under `[channels.<name>]`. Unset fields keep the
/// values passed to `configure` or the global section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChannelOverride {
    pub level: Option<Level>,
    pub file: Option<String>,
    pub console: Option<bool>,
}
