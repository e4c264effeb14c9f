//! Turns a [`Record`] into the single text line every sink receives.

use super::format::{FormatTemplate, FormatValues, Placeholder};
use crate::sink::Record;
use std::fmt::Write;

/// Layout plus timestamp format. Pure: the same record always renders the same line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    template: FormatTemplate,
    timestamp_format: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    /// Millisecond precision with a comma separator, e.g. `2025-01-15 14:30:00,123`.
    pub const DEFAULT_TIMESTAMP_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S,%3f";

    #[must_use]
    pub fn new() -> Self {
        Self {
            template: FormatTemplate::default(),
            timestamp_format: Self::DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    #[must_use]
    pub fn layout(mut self, layout: &str) -> Self {
        self.template = FormatTemplate::parse(layout);
        self
    }

    #[must_use]
    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    #[must_use]
    pub const fn template(&self) -> &FormatTemplate {
        &self.template
    }

    /// Renders one line without the trailing newline.
    #[must_use]
    pub fn format(&self, record: &Record) -> String {
        let fields = if self.template.uses(Placeholder::Fields) {
            record.fields.to_json()
        } else {
            String::new()
        };

        let values = FormatValues::new()
            .timestamp(self.render_timestamp(record))
            .channel(&record.channel)
            .level(record.level.as_str())
            .msg(&record.message)
            .fields(fields);

        self.template.render(&values)
    }

    /// A bad strftime string falls back to the default format instead of
    /// failing the emitting call.
    fn render_timestamp(&self, record: &Record) -> String {
        let mut out = String::new();
        if write!(out, "{}", record.timestamp.format(&self.timestamp_format)).is_ok() {
            return out;
        }
        out.clear();
        let _ = write!(
            out,
            "{}",
            record.timestamp.format(Self::DEFAULT_TIMESTAMP_FORMAT)
        );
        out
    }
}
