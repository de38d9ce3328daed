//! The three allocation moves.

use super::strategy::AdjustContext;
use crate::constraints::Ceilings;
use crate::model::{Allocation, Entity, EntityTable, OptimizationTarget};

/// Repairs an infeasible allocation.
///
/// 1. The `donor_count` largest positive shares (ties by id) each shrink by
///    `shrink_fraction` of their own value.
/// 2. The freed share is split evenly over up to `receiver_count` table
///    entities, best-ranked for the target first, skipping the largest donor
///    and any entity already at an entity or group ceiling.
///
/// When nobody can receive, the shrink stands on its own.
pub fn constraint_fix(allocation: &Allocation, ctx: &AdjustContext<'_>) -> Allocation {
    let config = ctx.config;
    let mut next = allocation.clone();

    let donors: Vec<&str> = allocation
        .ranked_desc()
        .into_iter()
        .filter(|&(_, share)| share > 0.0)
        .take(config.donor_count)
        .map(|(id, _)| id)
        .collect();
    let Some(&primary) = donors.first() else {
        return next;
    };

    let mut deficit = 0.0;
    for &id in &donors {
        let before = allocation.get(id);
        next.set(id, before * (1.0 - config.shrink_fraction));
        deficit += before - next.get(id);
    }

    let receivers: Vec<&str> = {
        let ceilings = Ceilings::new(&next, ctx.constraints);
        ctx.table
            .ranked(ctx.target)
            .into_iter()
            .map(|e| e.id.as_str())
            .filter(|&id| id != primary && !ceilings.is_saturated(id))
            .take(config.receiver_count)
            .collect()
    };

    tracing::trace!(
        donors = ?donors,
        receivers = ?receivers,
        deficit,
        "constraint fix"
    );

    if receivers.is_empty() || deficit <= 0.0 {
        return next;
    }

    let share = deficit / receivers.len() as f64;
    for id in receivers {
        next.adjust(id, share);
    }
    next
}

/// Moves `step` points from the worst-ranked table entity to the best-ranked
/// one, provided the worst holds at least `step` and the best holds nothing.
///
/// Only `MinCost` and `MinRisk` have a direction; `Balanced` leaves the
/// allocation unchanged. Ties on either end go to the earliest table entry.
pub fn fine_tune(
    allocation: &Allocation,
    table: &EntityTable,
    target: OptimizationTarget,
    step: f64,
) -> Allocation {
    let mut next = allocation.clone();
    if target == OptimizationTarget::Balanced {
        return next;
    }

    let mut entities = table.iter();
    let Some(first) = entities.next() else {
        return next;
    };
    let key = |e: &Entity| table.rank_key(e, target);
    let (mut best, mut worst) = (first, first);
    for e in entities {
        if key(e) < key(best) {
            best = e;
        }
        if key(e) > key(worst) {
            worst = e;
        }
    }
    if best.id == worst.id {
        return next;
    }

    if allocation.get(&worst.id) >= step && allocation.get(&best.id) <= 0.0 {
        next.adjust(&worst.id, -step);
        next.adjust(&best.id, step);
    }
    next
}

/// Moves `step` points from the largest share to the smallest one.
///
/// Needs at least two entries and a largest share of at least `step`.
pub fn rebalance(allocation: &Allocation, step: f64) -> Allocation {
    let mut next = allocation.clone();
    let ranked = allocation.ranked_desc();
    let (Some(&(largest, top)), Some(&(smallest, _))) = (ranked.first(), ranked.last()) else {
        return next;
    };
    if ranked.len() < 2 || top < step {
        return next;
    }

    next.adjust(largest, -step);
    next.adjust(smallest, step);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjust::AdjustConfig;
    use crate::constraints::Constraint;
    use crate::model::Entity;
    use proptest::prelude::*;

    fn two_entities() -> EntityTable {
        EntityTable::new(vec![
            Entity::new("A", 1000.0, 30.0),
            Entity::new("B", 950.0, 45.0),
        ])
        .unwrap()
    }

    fn four_entities() -> EntityTable {
        EntityTable::new(vec![
            Entity::new("Supplier_A", 1000.0, 30.0),
            Entity::new("Supplier_B", 950.0, 45.0),
            Entity::new("Region_India", 980.0, 50.0),
            Entity::new("Region_Thailand", 1020.0, 35.0),
        ])
        .unwrap()
    }

    fn ctx<'a>(
        table: &'a EntityTable,
        constraints: &'a [Constraint],
        target: OptimizationTarget,
        config: &'a AdjustConfig,
    ) -> AdjustContext<'a> {
        AdjustContext {
            table,
            constraints,
            target,
            config,
        }
    }

    #[test]
    fn test_constraint_fix_two_entity_scenario() {
        let table = two_entities();
        let config = AdjustConfig::default();
        let constraints = vec![Constraint::max_entity("A", 30.0)];
        let alloc = Allocation::from([("A", 80.0), ("B", 20.0)]);

        let next = constraint_fix(
            &alloc,
            &ctx(&table, &constraints, OptimizationTarget::Balanced, &config),
        );

        // A: 80 -> 76, B: 20 -> 19, freed 5 goes to B (A is the largest donor).
        assert!((next.get("A") - 76.0).abs() < 1e-9);
        assert!((next.get("B") - 24.0).abs() < 1e-9);
        assert!((next.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_constraint_fix_prefers_best_ranked_receivers() {
        let table = four_entities();
        let config = AdjustConfig::default();
        let constraints = vec![Constraint::max_entity("Supplier_A", 30.0)];
        let alloc = Allocation::from([("Supplier_A", 70.0), ("Supplier_B", 30.0)]);

        let next = constraint_fix(
            &alloc,
            &ctx(&table, &constraints, OptimizationTarget::MinCost, &config),
        );

        // Donors: A 70 -> 66.5, B 30 -> 28.5, deficit 5.
        // MinCost order without A: B(950), India(980), Thailand(1020).
        let share = 5.0 / 3.0;
        assert!((next.get("Supplier_A") - 66.5).abs() < 1e-9);
        assert!((next.get("Supplier_B") - (28.5 + share)).abs() < 1e-9);
        assert!((next.get("Region_India") - share).abs() < 1e-9);
        assert!((next.get("Region_Thailand") - share).abs() < 1e-9);
    }

    #[test]
    fn test_constraint_fix_skips_saturated_receivers() {
        let table = four_entities();
        let config = AdjustConfig::default();
        let constraints = vec![
            Constraint::max_entity("Supplier_B", 20.0),
            Constraint::max_group("India", 10.0),
        ];
        let alloc = Allocation::from([
            ("Supplier_A", 50.0),
            ("Supplier_B", 30.0),
            ("Region_India", 20.0),
        ]);

        let next = constraint_fix(
            &alloc,
            &ctx(&table, &constraints, OptimizationTarget::MinCost, &config),
        );

        // A 50 -> 47.5, B 30 -> 28.5 (still >= 20, saturated), India at 20 >= 10.
        // Only Thailand may receive the 4 freed points.
        assert!((next.get("Supplier_B") - 28.5).abs() < 1e-9);
        assert!((next.get("Region_India") - 20.0).abs() < 1e-9);
        assert!((next.get("Region_Thailand") - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_constraint_fix_activates_unused_entities() {
        let table = four_entities();
        let config = AdjustConfig::default();
        let constraints = vec![Constraint::min_active(3)];
        let alloc = Allocation::from([("Supplier_A", 100.0)]);

        let next = constraint_fix(
            &alloc,
            &ctx(&table, &constraints, OptimizationTarget::MinRisk, &config),
        );
        assert_eq!(next.active_count(), 4);
        assert!(next.ids().all(|id| table.contains(id)));
    }

    #[test]
    fn test_constraint_fix_empty_allocation_unchanged() {
        let table = two_entities();
        let config = AdjustConfig::default();
        let next = constraint_fix(
            &Allocation::new(),
            &ctx(&table, &[], OptimizationTarget::Balanced, &config),
        );
        assert!(next.is_empty());
    }

    #[test]
    fn test_fine_tune_min_cost() {
        let table = four_entities();
        let alloc = Allocation::from([
            ("Supplier_A", 40.0),
            ("Region_India", 30.0),
            ("Region_Thailand", 30.0),
        ]);
        let next = fine_tune(&alloc, &table, OptimizationTarget::MinCost, 2.0);
        assert!((next.get("Region_Thailand") - 28.0).abs() < 1e-12);
        assert!((next.get("Supplier_B") - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_fine_tune_min_risk() {
        let table = four_entities();
        let alloc = Allocation::from([("Supplier_B", 50.0), ("Region_India", 50.0)]);
        let next = fine_tune(&alloc, &table, OptimizationTarget::MinRisk, 2.0);
        assert!((next.get("Region_India") - 48.0).abs() < 1e-12);
        assert!((next.get("Supplier_A") - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_fine_tune_requires_unused_best_and_enough_worst() {
        let table = four_entities();
        // Best (B for MinCost) already allocated: no move.
        let alloc = Allocation::from([("Supplier_B", 50.0), ("Region_Thailand", 50.0)]);
        assert_eq!(
            fine_tune(&alloc, &table, OptimizationTarget::MinCost, 2.0),
            alloc
        );
        // Worst holds less than the step: no move.
        let alloc = Allocation::from([("Supplier_A", 98.5), ("Region_Thailand", 1.5)]);
        assert_eq!(
            fine_tune(&alloc, &table, OptimizationTarget::MinCost, 2.0),
            alloc
        );
    }

    #[test]
    fn test_fine_tune_balanced_is_noop() {
        let table = EntityTable::new(vec![
            Entity::new("A", 1000.0, 30.0),
            Entity::new("B", 950.0, 45.0),
            Entity::new("C", 100.0, 10.0),
        ])
        .unwrap();
        let alloc = Allocation::from([("A", 50.0), ("B", 50.0)]);
        assert_eq!(
            fine_tune(&alloc, &table, OptimizationTarget::Balanced, 2.0),
            alloc
        );
    }

    #[test]
    fn test_fine_tune_ties_pick_earliest_worst() {
        let table = EntityTable::new(vec![
            Entity::new("X", 1000.0, 30.0),
            Entity::new("Y", 1000.0, 40.0),
            Entity::new("Z", 900.0, 50.0),
        ])
        .unwrap();
        let alloc = Allocation::from([("X", 50.0), ("Y", 50.0)]);
        let next = fine_tune(&alloc, &table, OptimizationTarget::MinCost, 2.0);
        assert!((next.get("X") - 48.0).abs() < 1e-12);
        assert!((next.get("Y") - 50.0).abs() < 1e-12);
        assert!((next.get("Z") - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rebalance() {
        let alloc = Allocation::from([("A", 60.0), ("B", 30.0), ("C", 10.0)]);
        let next = rebalance(&alloc, 1.0);
        assert!((next.get("A") - 59.0).abs() < 1e-12);
        assert!((next.get("B") - 30.0).abs() < 1e-12);
        assert!((next.get("C") - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_rebalance_needs_two_entries_and_enough_share() {
        let single = Allocation::from([("A", 100.0)]);
        assert_eq!(rebalance(&single, 1.0), single);

        let thin = Allocation::from([("A", 0.5), ("B", 0.25)]);
        assert_eq!(rebalance(&thin, 1.0), thin);
    }

    fn arb_allocation() -> impl Strategy<Value = Allocation> {
        prop::collection::btree_map(
            prop::sample::select(vec![
                "Supplier_A",
                "Supplier_B",
                "Region_India",
                "Region_Thailand",
            ]),
            0.0..100.0f64,
            0..4,
        )
        .prop_map(|m| m.into_iter().collect())
    }

    fn arb_target() -> impl Strategy<Value = OptimizationTarget> {
        prop_oneof![
            Just(OptimizationTarget::MinCost),
            Just(OptimizationTarget::MinRisk),
            Just(OptimizationTarget::Balanced),
        ]
    }

    proptest! {
        #[test]
        fn prop_moves_stay_in_bounds_and_in_table(
            alloc in arb_allocation(),
            target in arb_target(),
            limit in 0.0..60.0f64,
        ) {
            let table = four_entities();
            let config = AdjustConfig::default();
            let constraints = vec![
                Constraint::max_entity("Supplier_A", limit),
                Constraint::max_group("Region", limit),
                Constraint::min_active(3),
            ];
            let c = ctx(&table, &constraints, target, &config);

            for next in [
                constraint_fix(&alloc, &c),
                fine_tune(&alloc, &table, target, config.fine_tune_step),
                rebalance(&alloc, config.rebalance_step),
            ] {
                for (id, share) in next.iter() {
                    prop_assert!(table.contains(id));
                    prop_assert!((0.0..=100.0).contains(&share));
                }
            }
        }

        #[test]
        fn prop_constraint_fix_never_grows_total(
            alloc in arb_allocation(),
            target in arb_target(),
        ) {
            let table = four_entities();
            let config = AdjustConfig::default();
            let next = constraint_fix(&alloc, &ctx(&table, &[], target, &config));
            prop_assert!(next.total() <= alloc.total() + 1e-9);
        }
    }
}
