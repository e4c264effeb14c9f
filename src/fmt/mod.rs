//! Rendering is split into the layout template, the record formatter, and the
//! structured extras payload.

mod fields;
mod format;
mod formatter;

pub use fields::{FieldValue, Fields};
pub use format::{FormatSegment, FormatTemplate, FormatValues, Placeholder};
pub use formatter::Formatter;
