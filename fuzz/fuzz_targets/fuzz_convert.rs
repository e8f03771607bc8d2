#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use paramstore::convert::convert;

fuzz_target!(|data: (&str, bool)| {
    let (text, json) = data;

    // === Conversions should never panic, whatever the text ===
    let _ = convert(&mut 0i8, text, json);
    let _ = convert(&mut 0u32, text, json);
    let _ = convert(&mut 0isize, text, json);
    let _ = convert(&mut 0f32, text, json);
    let _ = convert(&mut false, text, json);
    let _ = convert(&mut String::new(), text, json);
    let _ = convert(&mut Duration::ZERO, text, json);
    let _ = convert(&mut None::<u16>, text, json);
    let _ = convert(&mut Vec::<i64>::new(), text, json);
    let _ = convert(&mut serde_json::Value::Null, text, json);

    // === Failed integer conversions leave the slot untouched ===
    let mut slot = 7u8;
    if convert(&mut slot, text, false).is_err() {
        assert_eq!(slot, 7);
    }
});
