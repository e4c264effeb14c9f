//! TOML configuration loading, `source = "..."` include resolution, and
//! per-channel override lookup.
//!
//! Separated from struct definitions so that the loading logic (file I/O,
//! cycle detection, merge strategy) stays independent of the serde schema.

mod size;
mod structs;

pub use size::parse_size;
pub use structs::{
    ChannelOverride, ConsoleConfig, FormatConfig, GeneralConfig, LlmConfig, RotationConfig,
};

use crate::fmt::Formatter;
use crate::internal;
use crate::sink::RotationPolicy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// An empty file, or no file at all, yields the built-in defaults:
/// `logs/`, 10 MiB × 5 backups, console on stdout.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub rotation: RotationConfig,
    pub format: FormatConfig,
    pub console: ConsoleConfig,
    pub llm: LlmConfig,
    /// Overrides keyed by channel name.
    pub channels: HashMap<String, ChannelOverride>,
}

/// Pulls `source = "..."` lines out of raw TOML before deserialization.
/// Returns the include paths and the remaining content.
#[doc(hidden)]
#[must_use]
pub fn extract_sources(content: &str) -> (Vec<String>, String) {
    let mut sources = Vec::new();
    let mut remaining = String::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("source")
            && let Some(value) = rest.trim_start().strip_prefix('=')
        {
            let path = value.trim().trim_matches('"').trim_matches('\'');
            if !path.is_empty() {
                sources.push(path.to_string());
            }
        } else {
            remaining.push_str(line);
            remaining.push('\n');
        }
    }

    (sources, remaining)
}

/// Sections an included file may set that [`Config::merge`] does not take.
const INCLUDE_IGNORED_SECTIONS: &[&str] = &["general", "rotation", "format", "console", "llm"];

fn warn_ignored_sections(path: &Path, toml_content: &str) {
    let Ok(table) = toml_content.parse::<toml::Table>() else {
        return;
    };
    for section in INCLUDE_IGNORED_SECTIONS {
        if table.contains_key(*section) {
            internal::warn(
                "CONFIG",
                &format!(
                    "[{section}] in included {} is ignored; only [channels] is merged",
                    path.display()
                ),
            );
        }
    }
}

impl Config {
    /// Loads `path` with all includes resolved. A missing file yields defaults.
    ///
    /// # Errors
    /// Returns error if a file cannot be read, parsed, or includes form a cycle.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        let config = Self::load_with_sources(path, &mut HashSet::new())?;
        internal::debug("CONFIG", &format!("Config loaded from {}", path.display()));
        Ok(config)
    }

    /// Parses a TOML string. `source` lines are ignored here since there is
    /// no file to resolve them against.
    ///
    /// # Errors
    /// TOML syntax or type errors.
    pub fn from_toml(content: &str) -> Result<Self, crate::Error> {
        let (_, toml_content) = extract_sources(content);
        Ok(toml::from_str(&toml_content)?)
    }

    fn load_with_sources(path: &Path, seen: &mut HashSet<PathBuf>) -> Result<Self, crate::Error> {
        if !path.exists() {
            internal::debug("CONFIG", "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let is_include = !seen.is_empty();
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if !seen.insert(canonical.clone()) {
            internal::warn(
                "CONFIG",
                &format!("Cyclic include detected: {}", canonical.display()),
            );
            return Err(crate::Error::CyclicInclude(canonical));
        }

        let content = fs::read_to_string(path)?;
        let (sources, toml_content) = extract_sources(&content);
        let mut config: Self = toml::from_str(&toml_content)?;
        if is_include {
            warn_ignored_sections(path, &toml_content);
        }

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for source_path in sources {
            let expanded = shellexpand::tilde(&source_path);
            let mut source_file = PathBuf::from(expanded.as_ref());
            if source_file.is_relative() {
                source_file = base.join(source_file);
            }
            if source_file.exists() {
                let source_config = Self::load_with_sources(&source_file, seen)?;
                config.merge(source_config);
            } else {
                internal::warn("CONFIG", &format!("Source file not found: {source_path}"));
            }
        }

        Ok(config)
    }

    /// Folds an included config's channel overrides into `self` without
    /// replacing entries the primary file already defines. Only `[channels.*]`
    /// is taken from `other`; its `[general]`, `[rotation]`, `[format]`,
    /// `[console]` and `[llm]` sections are ignored.
    pub fn merge(&mut self, other: Self) {
        for (k, v) in other.channels {
            self.channels.entry(k).or_insert(v);
        }
    }

    /// Log directory with `~` expanded.
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.general.log_dir).as_ref())
    }

    /// `max_size` wins over `max_bytes` when it parses.
    #[must_use]
    pub fn rotation_policy(&self) -> RotationPolicy {
        let max_bytes = match self.rotation.max_size.as_deref() {
            Some(raw) => parse_size(raw).unwrap_or_else(|| {
                internal::warn(
                    "CONFIG",
                    &format!("Invalid rotation max_size '{raw}', using max_bytes"),
                );
                self.rotation.max_bytes
            }),
            None => self.rotation.max_bytes,
        };

        RotationPolicy {
            max_bytes,
            backup_count: self.rotation.backup_count,
            compress: self.rotation.compress,
        }
    }

    #[must_use]
    pub fn formatter(&self) -> Formatter {
        Formatter::new()
            .layout(&self.format.layout)
            .timestamp_format(&self.format.timestamp_format)
    }

    #[must_use]
    pub fn channel(&self, name: &str) -> Option<&ChannelOverride> {
        self.channels.get(name)
    }
}
