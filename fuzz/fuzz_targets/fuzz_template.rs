#![no_main]

use libfuzzer_sys::fuzz_target;
use paramstore::template::{has_placeholders, render};

fuzz_target!(|data: (&str, &str)| {
    let (template, value) = data;
    let params = serde_json::json!({ "env": value, "nested": { "name": value } });

    // === Rendering should never panic ===
    let result = render(template, &params);

    // === Text without actions renders unchanged ===
    if !has_placeholders(template) {
        assert_eq!(result.ok().as_deref(), Some(template));
    }
});
