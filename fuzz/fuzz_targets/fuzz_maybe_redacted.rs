#![no_main]

use libfuzzer_sys::fuzz_target;
use paramstore::MaybeRedacted;

fuzz_target!(|data: (String, bool)| {
    let (value, is_secret) = data;

    // Construction should never panic
    let redacted = MaybeRedacted::new(value.clone(), is_secret);

    // The raw value is always available to the owner
    assert_eq!(redacted.expose(), value.as_str());
    assert_eq!(redacted.is_secret(), is_secret);

    if is_secret {
        // CRITICAL: secret values never reach Display or Debug
        assert_eq!(format!("{redacted}"), "<redacted>");
        assert_eq!(format!("{redacted:?}"), "<redacted>");
    } else {
        assert_eq!(format!("{redacted}"), value);
    }
});
