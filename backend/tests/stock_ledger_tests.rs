//! Stock ledger tests
//!
//! Tests for movement application and status derivation including:
//! - Property 1: Stock Never Negative
//! - Property 2: Status Matches Stock Thresholds
//! - Property 3: Ledger Replay Determinism

use proptest::prelude::*;

use shared::stock::{apply_movement, derive_status};
use shared::{MovementType, ProductStatus};

/// Replay a movement sequence over a starting stock level.
fn replay(initial: i32, movements: &[(MovementType, i32)]) -> i32 {
    movements
        .iter()
        .fold(initial, |stock, &(movement_type, quantity)| {
            apply_movement(stock, movement_type, quantity)
        })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Outbound movement larger than on-hand clamps at zero
    #[test]
    fn test_oversold_outbound_clamps_to_zero() {
        let stock = apply_movement(12, MovementType::Out, 20);
        assert_eq!(stock, 0);

        let status = derive_status(stock, 10, ProductStatus::InStock);
        assert_eq!(status, ProductStatus::OutOfStock);
    }

    /// Transfers deduct exactly like outbound movements
    #[test]
    fn test_transfer_deducts_like_out() {
        assert_eq!(
            apply_movement(50, MovementType::Transfer, 20),
            apply_movement(50, MovementType::Out, 20)
        );
    }

    /// Adjustment sets the absolute level regardless of prior stock
    #[test]
    fn test_adjustment_is_absolute() {
        assert_eq!(apply_movement(999, MovementType::Adjustment, 7), 7);
        assert_eq!(apply_movement(0, MovementType::Adjustment, 7), 7);
    }

    /// A receipt then a matching issue is a no-op on the balance
    #[test]
    fn test_in_then_out_round_trip() {
        let stock = replay(
            40,
            &[(MovementType::In, 25), (MovementType::Out, 25)],
        );
        assert_eq!(stock, 40);
    }

    /// Status thresholds: zero is OUT, at-or-below min is LOW, above is IN
    #[test]
    fn test_status_thresholds() {
        assert_eq!(
            derive_status(0, 10, ProductStatus::InStock),
            ProductStatus::OutOfStock
        );
        assert_eq!(
            derive_status(10, 10, ProductStatus::InStock),
            ProductStatus::LowStock
        );
        assert_eq!(
            derive_status(11, 10, ProductStatus::InStock),
            ProductStatus::InStock
        );
    }

    /// Discontinued products keep their status whatever the stock does
    #[test]
    fn test_discontinued_is_sticky() {
        for stock in [0, 5, 10, 1000] {
            assert_eq!(
                derive_status(stock, 10, ProductStatus::Discontinued),
                ProductStatus::Discontinued
            );
        }
    }

    /// A restocked product leaves LOW_STOCK once above the threshold
    #[test]
    fn test_restock_recovers_status() {
        let stock = apply_movement(3, MovementType::In, 50);
        assert_eq!(stock, 53);
        assert_eq!(
            derive_status(stock, 10, ProductStatus::LowStock),
            ProductStatus::InStock
        );
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn movement_strategy() -> impl Strategy<Value = (MovementType, i32)> {
    (
        prop_oneof![
            Just(MovementType::In),
            Just(MovementType::Out),
            Just(MovementType::Adjustment),
            Just(MovementType::Transfer),
        ],
        1..10_000i32,
    )
}

proptest! {
    /// Property 1: no movement sequence can drive stock below zero
    #[test]
    fn prop_stock_never_negative(
        initial in 0..10_000i32,
        movements in prop::collection::vec(movement_strategy(), 0..50),
    ) {
        let final_stock = replay(initial, &movements);
        prop_assert!(final_stock >= 0);
    }

    /// Property 2: derived status always agrees with the thresholds
    #[test]
    fn prop_status_matches_thresholds(
        stock in 0..10_000i32,
        min_stock in 0..1_000i32,
    ) {
        let status = derive_status(stock, min_stock, ProductStatus::InStock);
        let expected = if stock == 0 {
            ProductStatus::OutOfStock
        } else if stock <= min_stock {
            ProductStatus::LowStock
        } else {
            ProductStatus::InStock
        };
        prop_assert_eq!(status, expected);
    }

    /// Property 3: replaying the same ledger twice gives the same balance
    #[test]
    fn prop_replay_is_deterministic(
        initial in 0..10_000i32,
        movements in prop::collection::vec(movement_strategy(), 0..50),
    ) {
        prop_assert_eq!(replay(initial, &movements), replay(initial, &movements));
    }

    /// Property 4: an adjustment erases all prior history
    #[test]
    fn prop_adjustment_overrides_history(
        initial in 0..10_000i32,
        movements in prop::collection::vec(movement_strategy(), 0..20),
        level in 1..10_000i32,
    ) {
        let stock = replay(initial, &movements);
        prop_assert_eq!(apply_movement(stock, MovementType::Adjustment, level), level);
    }
}
