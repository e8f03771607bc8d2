#![no_main]

use libfuzzer_sys::fuzz_target;
use paramstore::Tag;

fuzz_target!(|data: (&str, &str)| {
    let (annotation, env) = data;
    let params = serde_json::json!({ "env": env });

    // === Parsing should never panic ===
    let plain = Tag::parse(annotation, "field", None);
    let rendered = Tag::parse(annotation, "field", Some(&params));

    // === Skip and failure decisions do not depend on parameters ===
    assert_eq!(plain.is_ok(), rendered.is_ok());

    if let (Ok(Some(plain)), Ok(Some(rendered))) = (plain, rendered) {
        assert!(!plain.key.is_empty());
        assert_eq!(plain.key, plain.key.trim());
        assert_eq!(plain.decrypt, rendered.decrypt);
        assert_eq!(plain.json, rendered.json);
    }
});
