//! Property-based tests for paramstore invariants.
//!
//! These tests verify that critical invariants hold for all possible inputs,
//! not just hand-picked test cases.

#![allow(clippy::pedantic)]

use proptest::prelude::*;

// ============================================================================
// Tag Properties
// ============================================================================

mod tag_properties {
    use super::*;
    use paramstore::Tag;

    proptest! {
        /// Parsing never panics on any input
        #[test]
        fn parse_never_panics(s in ".*") {
            let _ = Tag::parse(&s, "field", None);
        }

        /// The key is the trimmed text before the first comma
        #[test]
        fn key_is_first_segment(key in "[a-zA-Z0-9/_.-]{1,40}", pad in " {0,3}") {
            let annotation = format!("{pad}{key}{pad},decrypt");
            let tag = Tag::parse(&annotation, "field", None).unwrap().unwrap();

            prop_assert_eq!(tag.key, key);
            prop_assert!(tag.decrypt);
            prop_assert!(!tag.json);
        }

        /// Option order and unknown options never matter
        #[test]
        fn options_are_order_independent(
            decrypt in prop::bool::ANY,
            json in prop::bool::ANY,
            noise in prop::collection::vec("[a-z]{1,8}", 0..4),
        ) {
            let mut options: Vec<String> = noise
                .into_iter()
                .filter(|o| o != "decrypt" && o != "json")
                .collect();
            if decrypt {
                options.push("decrypt".to_string());
            }
            if json {
                options.insert(0, "json".to_string());
            }

            let annotation = format!("/key,{}", options.join(","));
            let tag = Tag::parse(&annotation, "field", None).unwrap().unwrap();

            prop_assert_eq!(tag.decrypt, decrypt);
            prop_assert_eq!(tag.json, json);
        }

        /// A blank key is always rejected
        #[test]
        fn blank_key_rejected(pad in " {1,5}", rest in "[a-z,]{0,10}") {
            let annotation = format!("{pad},{rest}");
            prop_assert!(Tag::parse(&annotation, "field", None).is_err());
        }
    }
}

// ============================================================================
// Batching Properties
// ============================================================================

mod batch_properties {
    use super::*;
    use paramstore::batch::{batches, partition_stable};

    proptest! {
        /// Partitioning keeps every item and preserves relative order
        #[test]
        fn partition_is_stable(items in prop::collection::vec(0u32..1000, 0..100)) {
            let (odd, even) = partition_stable(items.clone(), |n| n % 2 == 0);

            let expected_odd: Vec<u32> = items.iter().copied().filter(|n| n % 2 != 0).collect();
            let expected_even: Vec<u32> = items.iter().copied().filter(|n| n % 2 == 0).collect();

            prop_assert_eq!(odd, expected_odd);
            prop_assert_eq!(even, expected_even);
        }

        /// Batches cover the input in order and never exceed the limit
        #[test]
        fn batches_respect_limit(len in 0usize..200, max in 0usize..15) {
            let mut items: Vec<usize> = (0..len).collect();
            let limit = max.max(1);

            let chunks: Vec<Vec<usize>> = batches(&mut items, max).map(|c| c.to_vec()).collect();

            prop_assert_eq!(chunks.len(), len.div_ceil(limit));
            prop_assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= limit));
            prop_assert_eq!(chunks.concat(), (0..len).collect::<Vec<_>>());
        }
    }
}

// ============================================================================
// Conversion Properties
// ============================================================================

mod convert_properties {
    use super::*;
    use paramstore::convert::{convert, parse_bool};

    proptest! {
        /// Conversion never panics on any text
        #[test]
        fn convert_never_panics(s in ".*") {
            let mut a = 0i8;
            let mut b = 0u64;
            let mut c = 0f32;
            let mut d = false;
            let mut e = std::time::Duration::ZERO;
            let mut f: Vec<u16> = Vec::new();
            let _ = convert(&mut a, &s, false);
            let _ = convert(&mut b, &s, false);
            let _ = convert(&mut c, &s, false);
            let _ = convert(&mut d, &s, false);
            let _ = convert(&mut e, &s, false);
            let _ = convert(&mut f, &s, false);
        }

        /// Every i64 in range of the target width is assigned exactly
        #[test]
        fn signed_in_range(n in i16::MIN..=i16::MAX) {
            let mut slot = 0i16;
            convert(&mut slot, &n.to_string(), false).unwrap();
            prop_assert_eq!(slot, n);
        }

        /// Values outside the target width are rejected
        #[test]
        fn signed_out_of_range(n in prop_oneof![i64::MIN..i64::from(i8::MIN), i64::from(i8::MAX) + 1..i64::MAX]) {
            let mut slot = 0i8;
            prop_assert!(convert(&mut slot, &n.to_string(), false).is_err());
            prop_assert_eq!(slot, 0);
        }

        /// Negative text never converts to an unsigned type
        #[test]
        fn unsigned_rejects_negative(n in i64::MIN..0) {
            let mut slot = 0u64;
            prop_assert!(convert(&mut slot, &n.to_string(), false).is_err());
        }

        /// Only the canonical spellings are booleans
        #[test]
        fn bool_is_canonical(s in "[a-zA-Z01]{1,6}") {
            let canonical = [
                "1", "t", "T", "TRUE", "true", "True",
                "0", "f", "F", "FALSE", "false", "False",
            ];
            prop_assert_eq!(parse_bool(&s).is_some(), canonical.contains(&s.as_str()));
        }

        /// Comma separated integers fill a list in order
        #[test]
        fn list_elements_in_order(values in prop::collection::vec(any::<i32>(), 1..20)) {
            let text = values.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
            let mut slot: Vec<i32> = vec![7; 3];

            convert(&mut slot, &text, false).unwrap();
            prop_assert_eq!(slot, values);
        }
    }
}

// ============================================================================
// Duration Properties
// ============================================================================

mod duration_properties {
    use super::*;
    use paramstore::duration::parse_duration;
    use std::time::Duration;

    proptest! {
        /// Parsing never panics on any input
        #[test]
        fn parse_never_panics(s in ".*") {
            let _ = parse_duration(&s);
        }

        /// Compound durations add up
        #[test]
        fn compound_units_add(h in 0u64..100, m in 0u64..60, s in 0u64..60, ms in 0u64..1000) {
            let text = format!("{h}h{m}m{s}s{ms}ms");
            let expected = Duration::from_secs(h * 3600 + m * 60 + s) + Duration::from_millis(ms);

            prop_assert_eq!(parse_duration(&text).unwrap(), expected);
        }

        /// Negative durations are always rejected
        #[test]
        fn negative_rejected(n in 1u64..10_000) {
            let text = format!("-{n}s");
            prop_assert!(parse_duration(&text).is_err());
        }
    }
}

// ============================================================================
// Redaction Properties
// ============================================================================

mod redaction_properties {
    use super::*;
    use paramstore::MaybeRedacted;

    proptest! {
        /// Secret values never appear in Display or Debug output
        #[test]
        fn secret_never_rendered(value in "[a-zA-Z0-9]{12,40}") {
            let redacted = MaybeRedacted::new(value.clone(), true);

            let displayed = format!("{redacted}");
            let debugged = format!("{redacted:?}");
            prop_assert!(!displayed.contains(&value));
            prop_assert!(!debugged.contains(&value));
            prop_assert_eq!(redacted.expose(), value.as_str());
        }

        /// Plain values render unchanged
        #[test]
        fn plain_rendered(value in ".*") {
            let plain = MaybeRedacted::new(value.clone(), false);
            prop_assert_eq!(plain.to_string(), value);
        }
    }
}
