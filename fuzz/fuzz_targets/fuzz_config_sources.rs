#![no_main]
use chanlog::config::extract_sources;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let (sources, remaining) = extract_sources(data);
    for source in &sources {
        assert!(!source.is_empty());
    }
    // Stripped content must still be accepted or rejected without panicking
    let _ = chanlog::Config::from_toml(&remaining);
});
