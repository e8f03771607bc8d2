#![no_main]

use libfuzzer_sys::fuzz_target;
use paramstore::duration::parse_duration;

fuzz_target!(|data: &str| {
    // === Parsing should never panic ===
    let parsed = parse_duration(data);

    // === Negative durations are never accepted ===
    if data.starts_with('-') {
        assert!(parsed.is_err());
    }
});
