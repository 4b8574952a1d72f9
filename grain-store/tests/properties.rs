//! Property-based tests for storage invariants
//!
//! Random operation sequences must never overfill a container or allocate
//! more containers than the storage has room for.

use proptest::prelude::*;

use grain_store::{Cereal, Storage};

#[derive(Debug, Clone)]
enum Op {
    Add(Cereal, f64),
    Take(Cereal, f64),
    Remove(Cereal),
}

fn cereal_strategy() -> impl Strategy<Value = Cereal> {
    prop_oneof![
        Just(Cereal::Buckwheat),
        Just(Cereal::Rice),
        Just(Cereal::Millet),
        Just(Cereal::Peas),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (cereal_strategy(), 0.0..25.0f64).prop_map(|(c, a)| Op::Add(c, a)),
        (cereal_strategy(), 0.0..25.0f64).prop_map(|(c, a)| Op::Take(c, a)),
        cereal_strategy().prop_map(Op::Remove),
    ]
}

proptest! {
    /// Fill levels stay within [0, container capacity] and the container
    /// count never exceeds what the storage capacity allows
    #[test]
    fn invariants_hold_across_operations(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut storage = Storage::new(10.0, 35.0).unwrap();
        let max_containers = storage.config().max_containers();

        for op in ops {
            match op {
                Op::Add(c, a) => { let _ = storage.add_good(c, a); }
                Op::Take(c, a) => { storage.take_good(c, a).unwrap(); }
                Op::Remove(c) => { storage.remove_container(c); }
            }
            for (_, amount) in storage.iter() {
                prop_assert!(amount >= 0.0);
                prop_assert!(amount <= storage.container_capacity());
            }
            prop_assert!(storage.container_count() <= max_containers);
        }
    }

    /// Whatever is added is either stored or handed back
    #[test]
    fn add_conserves_quantity(first in 0.0..20.0f64, second in 0.0..20.0f64) {
        let mut storage = Storage::new(10.0, 20.0).unwrap();
        let r1 = storage.add_good(Cereal::Rice, first).unwrap();
        let r2 = storage.add_good(Cereal::Rice, second).unwrap();
        let stored = storage.current_amount(Cereal::Rice);
        prop_assert!((stored + r1 + r2 - first - second).abs() < 1e-9);
    }

    /// Adding then taking the same amount returns it and frees the container
    #[test]
    fn add_then_take_round_trip(x in 0.0..=10.0f64, cereal in cereal_strategy()) {
        let mut storage = Storage::new(10.0, 20.0).unwrap();
        prop_assert_eq!(storage.add_good(cereal, x).unwrap(), 0.0);
        prop_assert_eq!(storage.take_good(cereal, x).unwrap(), x);
        prop_assert!(!storage.contains(cereal));
    }

    /// Taking never returns more than was stored
    #[test]
    fn take_is_bounded(stored in 0.0..=10.0f64, request in 0.0..30.0f64) {
        let mut storage = Storage::new(10.0, 20.0).unwrap();
        storage.add_good(Cereal::Millet, stored).unwrap();
        let taken = storage.take_good(Cereal::Millet, request).unwrap();
        prop_assert_eq!(taken, stored.min(request));
    }

    /// Negative amounts are rejected without touching the storage
    #[test]
    fn negative_amount_rejected(amount in -100.0..-0.001f64, cereal in cereal_strategy()) {
        let mut storage = Storage::new(10.0, 20.0).unwrap();
        storage.add_good(Cereal::Buckwheat, 4.0).unwrap();
        let before = storage.snapshot();
        prop_assert!(storage.add_good(cereal, amount).is_err());
        prop_assert!(storage.take_good(cereal, amount).is_err());
        prop_assert_eq!(storage.snapshot(), before);
    }

    /// Construction succeeds exactly when the capacity invariants hold
    #[test]
    fn construction_matches_invariants(c in -10.0..10.0f64, s in -10.0..20.0f64) {
        let valid = c >= 0.0 && s >= c;
        prop_assert_eq!(Storage::new(c, s).is_ok(), valid);
    }
}
