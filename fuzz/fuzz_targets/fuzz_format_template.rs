#![no_main]
use chanlog::fmt::{FormatTemplate, FormatValues};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Must not panic on any layout string
    let template = FormatTemplate::parse(data);

    let values = FormatValues::new()
        .timestamp("2025-01-01 00:00:00,000")
        .channel("fuzz")
        .level("INFO")
        .msg("test")
        .fields(r#"{"k":1}"#);
    let _ = template.render(&values);
});
