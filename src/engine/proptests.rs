//! Property-based tests for the flow engine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::flow::Validator;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn conv() -> SessionId {
    SessionId::from("prop-conv")
}

fn trigger(kind: FlowKind) -> &'static str {
    match kind {
        FlowKind::Registration => "register property",
        FlowKind::Verification => "verify land",
        FlowKind::DeedSearch => "deed search",
        FlowKind::Search => "search",
        FlowKind::Play => "play",
    }
}

/// Inputs that pass every step of each flow, in order
fn happy_path(kind: FlowKind) -> &'static [&'static str] {
    match kind {
        FlowKind::Registration => &["P-001", "TD-99", "a@b.com", "0700"],
        FlowKind::Verification => &["P-9", "Jane", "nakuru", "quick", "yes"],
        FlowKind::DeedSearch => &["TN12345678", "kisumu", "legal"],
        FlowKind::Search => &["rift valley"],
        FlowKind::Play => &["Levitating"],
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_kind() -> impl Strategy<Value = FlowKind> {
    prop_oneof![
        Just(FlowKind::Registration),
        Just(FlowKind::Verification),
        Just(FlowKind::DeedSearch),
        Just(FlowKind::Search),
        Just(FlowKind::Play),
    ]
}

/// A cancel word with random casing and padding
fn arb_cancel_word() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("cancel"), Just("exit"), Just("stop")],
        proptest::collection::vec(any::<bool>(), 6),
        " {0,3}",
        " {0,3}",
    )
        .prop_map(|(word, upper, lead, trail)| {
            let cased: String = word
                .chars()
                .zip(upper.into_iter().cycle())
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect();
            format!("{lead}{cased}{trail}")
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// A cancel word at any step of any flow ends the session
    #[test]
    fn prop_cancel_always_removes_session(
        kind in arb_kind(),
        depth in 0usize..5,
        word in arb_cancel_word(),
    ) {
        let engine = FlowEngine::default();
        let mut table = SessionTable::default();
        engine.try_start(&mut table, kind, trigger(kind), &conv()).unwrap();

        let steps = happy_path(kind);
        for input in steps.iter().take(depth.min(steps.len() - 1)) {
            engine.advance(&mut table, kind, input, &conv()).unwrap();
        }

        let t = engine.advance(&mut table, kind, &word, &conv()).unwrap();
        prop_assert!(matches!(t, Transition::Cancelled(_)));
        prop_assert!(table.get(kind, &conv()).is_none());
    }

    /// Rejected input never moves the step or touches stored data
    #[test]
    fn prop_rejection_leaves_session_unchanged(input in "[a-z0-9 ]{0,12}") {
        prop_assume!(!crate::flow::is_cancel(&input));
        let engine = FlowEngine::default();
        let mut table = SessionTable::default();
        let kind = FlowKind::DeedSearch;
        engine.try_start(&mut table, kind, "deed search", &conv()).unwrap();
        engine.advance(&mut table, kind, "TN12345678", &conv()).unwrap();
        let before = table.get(kind, &conv()).cloned().unwrap();

        let t = engine.advance(&mut table, kind, &input, &conv()).unwrap();
        if let Transition::Rejected(_) = t {
            prop_assert_eq!(table.get(kind, &conv()), Some(&before));
        } else {
            prop_assert!(["nairobi", "mombasa", "kisumu", "nakuru"].contains(&input.trim()));
        }
    }

    /// Stored data holds exactly the keys of the steps already passed
    #[test]
    fn prop_data_tracks_passed_steps(kind in arb_kind(), passed in 0usize..5) {
        let engine = FlowEngine::default();
        let mut table = SessionTable::default();
        engine.try_start(&mut table, kind, trigger(kind), &conv()).unwrap();

        let definition = engine.catalog().get(kind);
        let passed = passed.min(definition.steps().len() - 1);
        for input in happy_path(kind).iter().take(passed) {
            engine.advance(&mut table, kind, input, &conv()).unwrap();
        }

        let session = table.get(kind, &conv()).unwrap();
        let keys: Vec<&str> = session.data.keys().copied().collect();
        let mut expected: Vec<&str> = definition.steps()[..passed].iter().map(|s| s.key).collect();
        expected.sort_unstable();
        prop_assert_eq!(keys, expected);
        prop_assert_eq!(session.step_index(), Some(passed));
    }

    /// The deed validator accepts exactly `^TN[0-9]{8}$` after upper-casing
    #[test]
    fn prop_deed_number_matches_pattern(raw in "(?i:tn)?[0-9a-z]{0,10}") {
        let upper = raw.to_uppercase();
        let expected = upper.len() == 10
            && upper.starts_with("TN")
            && upper.get(2..).is_some_and(|d| d.chars().all(|c| c.is_ascii_digit()));

        match Validator::DeedNumber.check(&raw) {
            Verdict::Accept(Some(stored)) => {
                prop_assert!(expected);
                prop_assert_eq!(stored, upper);
            }
            Verdict::Reject(_) => prop_assert!(!expected),
            other => prop_assert!(false, "unexpected verdict {:?}", other),
        }
    }

    /// Completing a flow always removes its session
    #[test]
    fn prop_completion_is_terminal(kind in arb_kind()) {
        let engine = FlowEngine::default();
        let mut table = SessionTable::default();
        engine.try_start(&mut table, kind, trigger(kind), &conv()).unwrap();

        let mut last = None;
        for input in happy_path(kind) {
            last = Some(engine.advance(&mut table, kind, input, &conv()).unwrap());
        }
        prop_assert!(matches!(last, Some(Transition::Completed(_))));
        prop_assert!(table.is_empty());
    }
}
