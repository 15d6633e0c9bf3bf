//! Property-based tests for the term language and failpoint names
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{Action, FailpointName, Position, Term};
use proptest::prelude::*;

fn action_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("off".to_string()),
        Just("return".to_string()),
        Just("panic".to_string()),
        Just("print".to_string()),
        any::<i64>().prop_map(|i| format!("return({i})")),
        any::<bool>().prop_map(|b| format!("return({b})")),
        "[a-zA-Z0-9 ;=>-]{0,12}".prop_map(|s| format!("return(\"{s}\")")),
        (0u64..10_000).prop_map(|ms| format!("sleep({ms})")),
        (1u64..500).prop_map(|ms| format!("sleep(\"{ms}ms\")")),
    ]
}

fn segment_strategy() -> impl Strategy<Value = String> {
    (
        prop::option::of(1u32..=100),
        prop::option::of(1u64..1_000_000),
        action_strategy(),
    )
        .prop_map(|(percent, count, action)| {
            let mut segment = String::new();
            if let Some(p) = percent {
                segment.push_str(&format!("{p}%"));
            }
            if let Some(c) = count {
                segment.push_str(&format!("{c}*"));
            }
            segment.push_str(&action);
            segment
        })
}

fn term_strategy() -> impl Strategy<Value = (String, usize)> {
    prop::collection::vec(segment_strategy(), 1..5).prop_map(|segments| {
        let len = segments.len();
        (segments.join("->"), len)
    })
}

// ============================================================================
// Term Parser Property Tests
// ============================================================================

mod parser_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_terms_echo_verbatim((spec, _) in term_strategy()) {
            let term = Term::parse(&spec);
            prop_assert!(term.is_ok(), "{spec} failed: {term:?}");
            prop_assert_eq!(term.unwrap().to_string(), spec);
        }

        #[test]
        fn segment_count_matches_chain((spec, len) in term_strategy()) {
            let term = Term::parse(&spec).unwrap();
            prop_assert_eq!(term.segments().len(), len);
        }

        #[test]
        fn zero_count_rejected(action in action_strategy()) {
            let spec = format!("0*{action}");
            prop_assert!(Term::parse(&spec).is_err());
        }

        #[test]
        fn negative_count_rejected(n in 1i64..1_000_000, action in action_strategy()) {
            let spec = format!("-{n}*{action}");
            prop_assert!(Term::parse(&spec).is_err());
        }

        #[test]
        fn percentage_above_hundred_rejected(p in 101u32..100_000, action in action_strategy()) {
            let spec = format!("{p}%{action}");
            prop_assert!(Term::parse(&spec).is_err());
        }

        #[test]
        fn arbitrary_input_never_panics(input in "\\PC{0,40}") {
            let _ = Term::parse(&input);
        }

        #[test]
        fn multibyte_text_around_separators_never_panics(
            left in "[a-z0-9*%()é€😀 -]{0,12}",
            right in "[a-z0-9*%()ñ€😀 >-]{0,12}"
        ) {
            let _ = Term::parse(&format!("{left}->{right}"));
        }
    }
}

// ============================================================================
// Evaluator Property Tests
// ============================================================================

mod evaluator_tests {
    use super::*;

    proptest! {
        #[test]
        fn counted_segment_fires_exactly_count_times(count in 1u64..50, extra in 1usize..20) {
            let term = Term::parse(&format!("{count}*return->off")).unwrap();
            let mut position = Position::start(&term);

            let fired = (0..count as usize + extra)
                .filter(|_| !position.advance(&term).is_off())
                .count();
            prop_assert_eq!(fired as u64, count);
        }

        #[test]
        fn count_less_segment_never_moves(hits in 1usize..100) {
            let term = Term::parse("return->off").unwrap();
            let mut position = Position::start(&term);
            for _ in 0..hits {
                prop_assert_eq!(position.advance(&term), Action::Return(None));
            }
            prop_assert_eq!(position.segment_index(), 0);
        }
    }
}

// ============================================================================
// FailpointName Property Tests
// ============================================================================

mod failpoint_name_tests {
    use super::*;

    proptest! {
        #[test]
        fn identifier_names_accepted(name in "[A-Za-z][A-Za-z0-9_.:-]{0,63}") {
            prop_assume!(name != "failpoints");
            let parsed = FailpointName::new(name.clone());
            prop_assert!(parsed.is_ok());
            let parsed = parsed.unwrap();
            prop_assert_eq!(parsed.as_str(), name.as_str());
        }

        #[test]
        fn names_with_delimiters_rejected(
            prefix in "[a-z]{0,8}",
            delimiter in prop_oneof![Just('/'), Just('='), Just(';'), Just(' ')],
            suffix in "[a-z]{0,8}"
        ) {
            let name = format!("{prefix}{delimiter}{suffix}");
            prop_assert!(FailpointName::new(name).is_err());
        }
    }
}
