//! Property-based tests for the selection invariants.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::SelectionError,
    generate::{GenerationRequest, Generated, RngDraw},
    selection::SelectionEngine,
    universe::{PurchaseConstraints, QuotaUniverse, SoldSet},
};

#[derive(Debug, Clone)]
enum Op {
    Toggle(u32),
    Random(u32),
    Interval(u32, u32),
    Confirm(u32, u32),
    Clear,
    Refresh(Vec<u32>),
}

/// Universe size plus a sold subset of it.
fn universe_strategy() -> impl Strategy<Value = (u32, Vec<u32>)> {
    (1u32..60).prop_flat_map(|total| {
        (
            Just(total),
            prop::collection::vec(1..=total, 0..total as usize),
        )
    })
}

fn constraints_strategy() -> impl Strategy<Value = PurchaseConstraints> {
    (1u32..6, prop::option::of(1u32..30)).prop_map(|(min, max)| PurchaseConstraints::new(min, max))
}

fn op_strategy(total: u32) -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..=total + 1).prop_map(Op::Toggle),
        2 => (0..=total + 1).prop_map(Op::Random),
        1 => (0..=total + 1, 0..=total + 1).prop_map(|(from, to)| Op::Interval(from, to)),
        1 => (0..=total + 1, 0..=total + 1).prop_map(|(from, to)| Op::Confirm(from, to)),
        1 => Just(Op::Clear),
        1 => prop::collection::vec(1..=total, 0..total as usize).prop_map(Op::Refresh),
    ]
}

fn scenario_strategy() -> impl Strategy<Value = (u32, Vec<u32>, PurchaseConstraints, Vec<Op>, u64)> {
    (universe_strategy(), constraints_strategy(), any::<u64>()).prop_flat_map(
        |((total, sold), constraints, seed)| {
            (
                Just(total),
                Just(sold),
                Just(constraints),
                prop::collection::vec(op_strategy(total), 0..40),
                Just(seed),
            )
        },
    )
}

fn engine(total: u32, sold: &[u32], constraints: PurchaseConstraints) -> SelectionEngine {
    let universe = QuotaUniverse::new(total);
    let sold = SoldSet::new(universe, sold.iter().copied()).unwrap();

    SelectionEngine::new(universe, sold, constraints)
}

proptest! {
    /// Property: no sequence of operations puts a sold or out-of-range number in the selection.
    #[test]
    fn prop_selection_disjoint_and_bounded(
        (total, sold, constraints, ops, seed) in scenario_strategy()
    ) {
        let mut engine = engine(total, &sold, constraints);
        let mut draw = RngDraw(StdRng::seed_from_u64(seed));

        for op in ops {
            match op {
                Op::Toggle(number) => {
                    let _ = engine.toggle(number);
                }
                Op::Random(count) => {
                    let _ = engine.generate(&GenerationRequest::Random { count }, &mut draw);
                }
                Op::Interval(from, to) => {
                    let _ = engine.generate(&GenerationRequest::Interval { from, to }, &mut draw);
                }
                Op::Confirm(from, to) => {
                    let preview = engine.preview_interval(from, to);
                    if engine.confirm(preview).is_ok() {
                        prop_assert!(engine.validate().is_valid());
                    }
                }
                Op::Clear => engine.clear(),
                Op::Refresh(numbers) => {
                    let sold = SoldSet::new(engine.universe(), numbers).unwrap();
                    engine.refresh(sold).unwrap();
                }
            }

            for number in engine.selection() {
                prop_assert!(!engine.sold().contains(*number));
                prop_assert!(engine.universe().contains(*number));
            }
        }
    }

    /// Property: toggling the same number twice restores a toggle-built selection.
    #[test]
    fn prop_toggle_twice_restores(
        (total, sold) in universe_strategy(),
        constraints in constraints_strategy(),
        picks in prop::collection::vec(0u32..70, 0..20),
        probe in 0u32..70,
    ) {
        let mut engine = engine(total, &sold, constraints);
        for number in picks {
            let _ = engine.toggle(number);
        }
        let before = engine.selection().clone();

        let _ = engine.toggle(probe);
        let _ = engine.toggle(probe);

        prop_assert_eq!(engine.selection(), &before);
    }

    /// Property: a random request either fills exactly `count` open numbers or changes nothing.
    #[test]
    fn prop_random_all_or_nothing(
        (total, sold) in universe_strategy(),
        count in 0u32..70,
        seed in any::<u64>(),
    ) {
        let mut engine = engine(total, &sold, PurchaseConstraints::default());
        let mut draw = RngDraw(StdRng::seed_from_u64(seed));
        let before: BTreeSet<u32> = engine.selection().clone();
        let available = engine.available();

        match engine.generate(&GenerationRequest::Random { count }, &mut draw) {
            Ok(Generated::Applied(applied)) => {
                prop_assert_eq!(applied, count);
                prop_assert_eq!(engine.len(), count);
                prop_assert!(engine.selection().iter().all(|number| !engine.sold().contains(*number)));
            }
            Ok(Generated::Preview(_)) => prop_assert!(false, "random requests never preview"),
            Err(error) => {
                prop_assert_eq!(engine.selection(), &before);
                if count > available {
                    prop_assert!(matches!(
                        error,
                        SelectionError::InsufficientAvailableQuotas | SelectionError::NoQuotasAvailable
                    ));
                }
            }
        }
    }

    /// Property: interval previews are order independent.
    #[test]
    fn prop_interval_order_independent(
        (total, sold) in universe_strategy(),
        constraints in constraints_strategy(),
        from in 0u32..70,
        to in 0u32..70,
    ) {
        let engine = engine(total, &sold, constraints);

        prop_assert_eq!(engine.preview_interval(from, to), engine.preview_interval(to, from));
    }
}
