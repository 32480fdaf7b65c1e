use adc_merge::{Contribution, LastWriterStrategy, MergeStrategy, StrictStrategy};
use adc_tree::ParameterTree;
use proptest::prelude::*;

/// Leaves drawn from a small path space so that contributions overlap
fn leaves() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec(("[a-d](/[a-d]){0,2}", "[01]"), 0..12)
}

/// Contributions whose overlapping leaves always agree
fn agreeing(sets: Vec<Vec<(String, String)>>) -> Vec<Contribution> {
    sets.into_iter()
        .enumerate()
        .map(|(i, leaves)| {
            // value is a function of the path, so writers never disagree
            let tree: ParameterTree = leaves
                .into_iter()
                .map(|(path, _)| {
                    let value = path.len().to_string();
                    (path, value)
                })
                .collect();
            Contribution::new(format!("task{i}"), tree)
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_strict_merge_is_order_independent(
        sets in proptest::collection::vec(leaves(), 1..6),
        rotation in 0..6usize,
    ) {
        let forward = agreeing(sets);
        let mut rotated = forward.clone();
        let len = rotated.len();
        rotated.rotate_left(rotation % len);

        let a = StrictStrategy::new().compose(&forward).unwrap();
        let b = StrictStrategy::new().compose(&rotated).unwrap();
        prop_assert_eq!(a.tree, b.tree);
    }

    #[test]
    fn prop_strategies_agree_when_writers_agree(
        sets in proptest::collection::vec(leaves(), 1..6),
    ) {
        let contributions = agreeing(sets);
        let strict = StrictStrategy::new().compose(&contributions).unwrap();
        let lenient = LastWriterStrategy::new().compose(&contributions).unwrap();
        prop_assert_eq!(strict.tree, lenient.tree);
    }

    #[test]
    fn prop_strict_validate_matches_compose(
        sets in proptest::collection::vec(leaves(), 1..6),
    ) {
        let contributions: Vec<Contribution> = sets
            .into_iter()
            .enumerate()
            .map(|(i, leaves)| {
                Contribution::new(format!("task{i}"), leaves.into_iter().collect::<ParameterTree>())
            })
            .collect();

        let strategy = StrictStrategy::new();
        prop_assert_eq!(
            strategy.validate(&contributions).is_ok(),
            strategy.compose(&contributions).is_ok()
        );
    }
}
